//! Barcode commands and the `^BY` barcode defaults.

use nom::{
    IResult,
    bytes::complete::tag,
    combinator::opt,
};

use super::params::{decimal, letter, next, orientation, unsigned, yes_no};
use crate::commands::{BarcodeType, Code128Mode, Orientation, ZplFormatCommand};

pub fn parse_by(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^BY")(input)?;
    let (input, module_width) = opt(unsigned::<u8>)(input)?;
    let (input, ratio) = next(decimal)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;

    Ok((
        input,
        ZplFormatCommand::BarcodeDefaults {
            module_width: module_width.unwrap_or(2).clamp(1, 10),
            ratio: ratio.unwrap_or(3.0).clamp(2.0, 3.0),
            height: height.unwrap_or(10),
        },
    ))
}

/// `^B3o,e,h,f,g`
pub fn parse_b3(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^B3")(input)?;
    let (input, orientation) = opt(orientation)(input)?;
    let (input, check_digit) = next(yes_no)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;
    let (input, show_text) = next(yes_no)(input)?;
    let (input, text_above) = next(yes_no)(input)?;

    Ok((
        input,
        ZplFormatCommand::Barcode(BarcodeType::Code39 {
            orientation: orientation.unwrap_or(Orientation::Normal),
            check_digit: check_digit.unwrap_or(false),
            height,
            show_text: show_text.unwrap_or(true),
            text_above: text_above.unwrap_or(false),
        }),
    ))
}

/// `^BCo,h,f,g,e,m`
pub fn parse_bc(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^BC")(input)?;
    let (input, orientation) = opt(orientation)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;
    let (input, show_text) = next(yes_no)(input)?;
    let (input, text_above) = next(yes_no)(input)?;
    let (input, check_digit) = next(yes_no)(input)?;
    let (input, mode) = next(letter)(input)?;

    Ok((
        input,
        ZplFormatCommand::Barcode(BarcodeType::Code128 {
            orientation: orientation.unwrap_or(Orientation::Normal),
            height,
            show_text: show_text.unwrap_or(true),
            text_above: text_above.unwrap_or(false),
            check_digit: check_digit.unwrap_or(false),
            mode: mode.map(Code128Mode::from_char).unwrap_or_default(),
        }),
    ))
}

/// `^BEo,h,f,g`
pub fn parse_be(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^BE")(input)?;
    let (input, (orientation, height, show_text, text_above)) = ean_params(input)?;
    Ok((
        input,
        ZplFormatCommand::Barcode(BarcodeType::Ean13 {
            orientation,
            height,
            show_text,
            text_above,
        }),
    ))
}

/// `^B8o,h,f,g`
pub fn parse_b8(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^B8")(input)?;
    let (input, (orientation, height, show_text, text_above)) = ean_params(input)?;
    Ok((
        input,
        ZplFormatCommand::Barcode(BarcodeType::Ean8 {
            orientation,
            height,
            show_text,
            text_above,
        }),
    ))
}

fn ean_params(input: &str) -> IResult<&str, (Orientation, Option<usize>, bool, bool)> {
    let (input, orientation) = opt(orientation)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;
    let (input, show_text) = next(yes_no)(input)?;
    let (input, text_above) = next(yes_no)(input)?;
    Ok((
        input,
        (
            orientation.unwrap_or(Orientation::Normal),
            height,
            show_text.unwrap_or(true),
            text_above.unwrap_or(false),
        ),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_by_test() {
        let (remain, zpl) = parse_by("^BY3,2,120^FT").unwrap();
        assert_eq!(remain, "^FT");
        assert_eq!(
            zpl,
            ZplFormatCommand::BarcodeDefaults {
                module_width: 3,
                ratio: 2.0,
                height: 120
            }
        );
    }

    #[test]
    fn parse_by_defaults_test() {
        let (_, zpl) = parse_by("^BY4").unwrap();
        assert_eq!(
            zpl,
            ZplFormatCommand::BarcodeDefaults {
                module_width: 4,
                ratio: 3.0,
                height: 10
            }
        );
        let (_, zpl) = parse_by("^BY20,2.5").unwrap();
        assert_eq!(
            zpl,
            ZplFormatCommand::BarcodeDefaults {
                module_width: 10,
                ratio: 2.5,
                height: 10
            }
        );
    }

    #[test]
    fn parse_bc_test() {
        let (remain, zpl) = parse_bc("^BCN,100,Y,N,N,A^FD").unwrap();
        assert_eq!(remain, "^FD");
        assert_eq!(
            zpl,
            ZplFormatCommand::Barcode(BarcodeType::Code128 {
                orientation: Orientation::Normal,
                height: Some(100),
                show_text: true,
                text_above: false,
                check_digit: false,
                mode: Code128Mode::Auto
            })
        );
    }

    #[test]
    fn parse_bc_defaults_test() {
        let (remain, zpl) = parse_bc("^BC^FD").unwrap();
        assert_eq!(remain, "^FD");
        assert_eq!(
            zpl,
            ZplFormatCommand::Barcode(BarcodeType::Code128 {
                orientation: Orientation::Normal,
                height: None,
                show_text: true,
                text_above: false,
                check_digit: false,
                mode: Code128Mode::Normal
            })
        );

        let (_, zpl) = parse_bc("^BCR,,N").unwrap();
        assert_eq!(
            zpl,
            ZplFormatCommand::Barcode(BarcodeType::Code128 {
                orientation: Orientation::Rotated,
                height: None,
                show_text: false,
                text_above: false,
                check_digit: false,
                mode: Code128Mode::Normal
            })
        );
    }

    #[test]
    fn parse_b3_test() {
        let (_, zpl) = parse_b3("^B3N,Y,80,N,N").unwrap();
        assert_eq!(
            zpl,
            ZplFormatCommand::Barcode(BarcodeType::Code39 {
                orientation: Orientation::Normal,
                check_digit: true,
                height: Some(80),
                show_text: false,
                text_above: false
            })
        );
    }

    #[test]
    fn parse_be_and_b8_test() {
        let (_, zpl) = parse_be("^BEN,60,Y,Y").unwrap();
        assert_eq!(
            zpl,
            ZplFormatCommand::Barcode(BarcodeType::Ean13 {
                orientation: Orientation::Normal,
                height: Some(60),
                show_text: true,
                text_above: true
            })
        );

        let (remain, zpl) = parse_b8("^B8I^FD1234567^FS").unwrap();
        assert_eq!(remain, "^FD1234567^FS");
        assert_eq!(
            zpl,
            ZplFormatCommand::Barcode(BarcodeType::Ean8 {
                orientation: Orientation::Inverted,
                height: None,
                show_text: true,
                text_above: false
            })
        );
    }
}
