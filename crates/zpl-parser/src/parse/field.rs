//! Field commands: positioning, fonts, text blocks and field data.

use nom::{
    IResult,
    bytes::complete::{tag, take_till},
    character::complete::{char, none_of},
    combinator::{map, not, opt},
    multi::many0,
    sequence::{preceded, tuple},
};

use super::params::{letter, next, orientation, signed, unsigned};
use crate::commands::{Justification, Orientation, TextBlockJustification, ZplFormatCommand};

/// Default `^FH` escape character.
const DEFAULT_HEX_INDICATOR: char = '_';

/// `x,y,z` of `^FO` and `^FT`; omitted coordinates are 0.
fn parse_coordinates(input: &str) -> IResult<&str, (i32, i32, Justification)> {
    let (input, x) = opt(signed)(input)?;
    let (input, y) = next(signed)(input)?;
    let (input, justification) = next(unsigned::<u8>)(input)?;
    Ok((
        input,
        (x.unwrap_or(0), y.unwrap_or(0), justification.into()),
    ))
}

pub fn parse_fo(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, (x, y, justification)) = preceded(tag("^FO"), parse_coordinates)(input)?;
    Ok((
        input,
        ZplFormatCommand::FieldOrigin {
            x,
            y,
            justification,
        },
    ))
}

pub fn parse_ft(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, (x, y, justification)) = preceded(tag("^FT"), parse_coordinates)(input)?;
    Ok((
        input,
        ZplFormatCommand::FieldTypeset {
            x,
            y,
            justification,
        },
    ))
}

/// Field data runs up to the next command prefix; line breaks are not data.
pub fn parse_fd(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^FD")(input)?;
    let (input, text) = take_till(|c| c == '^')(input)?;
    let text = text.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    Ok((input, ZplFormatCommand::FieldData(text)))
}

pub fn parse_fs(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^FS")(input)?;
    Ok((input, ZplFormatCommand::FieldSeparator))
}

pub fn parse_fr(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^FR")(input)?;
    Ok((input, ZplFormatCommand::FieldReverse))
}

pub fn parse_fh(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^FH")(input)?;
    let (input, indicator) = opt(none_of("^~\r\n"))(input)?;
    Ok((
        input,
        ZplFormatCommand::FieldHexIndicator {
            indicator: indicator.unwrap_or(DEFAULT_HEX_INDICATOR),
        },
    ))
}

pub fn parse_fb(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^FB")(input)?;
    let (input, width) = opt(unsigned)(input)?;
    let (input, lines) = next(unsigned)(input)?;
    let (input, line_spacing) = next(signed)(input)?;
    let (input, justification) = next(letter)(input)?;
    let (input, hanging_indent) = next(unsigned)(input)?;

    Ok((
        input,
        ZplFormatCommand::FieldBlock {
            width: width.unwrap_or(0),
            lines: lines.unwrap_or(1).max(1),
            line_spacing: line_spacing.unwrap_or(0),
            justification: TextBlockJustification::from(justification),
            hanging_indent: hanging_indent.unwrap_or(0),
        },
    ))
}

/// `^Afo,h,w`; the width defaults to the height.
pub fn parse_a(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^A")(input)?;
    let (input, (name, orientation, height, width)) = tuple((
        letter,
        opt(orientation),
        preceded(char(','), unsigned::<usize>),
        next(unsigned::<usize>),
    ))(input)?;

    Ok((
        input,
        ZplFormatCommand::Font {
            name,
            orientation: orientation.unwrap_or(Orientation::Normal),
            height,
            width: width.unwrap_or(height),
        },
    ))
}

/// `^CFf,h,w`; a missing dimension copies the other, both missing is an error.
pub fn parse_cf(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^CF")(input)?;
    let (rest, (name, height, width)) =
        tuple((letter, next(unsigned::<usize>), next(unsigned::<usize>)))(input)?;

    let (height, width) = match (height, width) {
        (None, None) => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            )));
        }
        (None, Some(w)) => (w, w),
        (Some(h), None) => (h, h),
        (Some(h), Some(w)) => (h, w),
    };

    Ok((
        rest,
        ZplFormatCommand::ChangeFont {
            name,
            height,
            width,
        },
    ))
}

/// `^CIn,a1,b1,a2,b2,...`; a dangling source byte is an error.
pub fn parse_ci(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^CI")(input)?;
    let (input, num) = unsigned::<u8>(input)?;
    let (input, mapping) = many0(map(
        tuple((
            char(','),
            unsigned::<u8>,
            char(','),
            unsigned::<u8>,
        )),
        |(_, from, _, to)| (from, to),
    ))(input)?;
    let (input, _) = not(char(','))(input)?;
    Ok((input, ZplFormatCommand::CharacterSet { num, mapping }))
}

/// `^FX` comment, up to the end of the line.
pub(super) fn parse_fx(input: &str) -> IResult<&str, ()> {
    let (input, _) = tag("^FX")(input)?;
    let (input, _) = take_till(|c| c == '\n' || c == '\r')(input)?;
    Ok((input, ()))
}
