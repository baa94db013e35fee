//! nom parsers for ZPL formats.
//!
//! A document may hold any number of `^XA ... ^XZ` formats. Each format body
//! is parsed command by command; the first command that is not understood
//! aborts parsing with [`ParseError::InvalidSyntax`] quoting the input at that
//! point. A few printer setup commands (`^MD`, `^PQ`, ...) and `^FX` comments
//! are accepted and dropped because they do not change what is printed.

mod barcode;
mod field;
mod graphic;
mod label;
mod params;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::multispace0,
    combinator::{cut, value},
    sequence::preceded,
};

use crate::commands::ZplFormatCommand;
use crate::error::{ParseError, Result};

use self::barcode::{parse_b3, parse_b8, parse_bc, parse_be, parse_by};
use self::field::{
    parse_a, parse_cf, parse_ci, parse_fb, parse_fd, parse_fh, parse_fo, parse_fr, parse_fs,
    parse_ft, parse_fx,
};
use self::graphic::{parse_gb, parse_gc, parse_gd, parse_ge, parse_gf};
use self::label::{parse_lh, parse_ll, parse_lr, parse_ls, parse_po, parse_pw};

const FORMAT_START: &str = "^XA";
const FORMAT_END: &str = "^XZ";

/// Parses a single supported command.
pub fn parse_command(input: &str) -> IResult<&str, ZplFormatCommand> {
    alt((
        alt((
            parse_fo, parse_ft, parse_fd, parse_fs, parse_fh, parse_fb, parse_fr, parse_a,
            parse_cf, parse_ci,
        )),
        alt((parse_gb, parse_gc, parse_ge, parse_gd, parse_gf)),
        alt((parse_by, parse_b3, parse_bc, parse_be, parse_b8)),
        alt((parse_pw, parse_ll, parse_ls, parse_lh, parse_lr, parse_po)),
    ))(input)
}

/// Printer setup commands that have no effect on the rendered label.
fn parse_ignored(input: &str) -> IResult<&str, ()> {
    alt((
        parse_fx,
        value(
            (),
            preceded(
                alt((
                    tag("^MD"),
                    tag("^MM"),
                    tag("^MN"),
                    tag("^MT"),
                    tag("^PR"),
                    tag("^PQ"),
                )),
                take_till(|c| c == '^'),
            ),
        ),
    ))(input)
}

/// Skips whitespace and ignored commands.
fn skip_filler(mut input: &str) -> IResult<&str, ()> {
    loop {
        let (rest, _) = multispace0(input)?;
        match parse_ignored(rest) {
            Ok((rest, ())) => input = rest,
            Err(nom::Err::Error(_)) => return Ok((rest, ())),
            Err(err) => return Err(err),
        }
    }
}

/// Parses a format body up to `^XZ` or the end of input.
fn parse_body(mut input: &str) -> IResult<&str, Vec<ZplFormatCommand>> {
    let mut commands = Vec::new();
    loop {
        let (rest, ()) = skip_filler(input)?;
        if rest.is_empty() || rest.starts_with(FORMAT_END) {
            return Ok((rest, commands));
        }
        let (rest, command) = cut(parse_command)(rest)?;
        commands.push(command);
        input = rest;
    }
}

/// Splits a document into format bodies, without the `^XA`/`^XZ` framing.
fn find_labels(input: &str) -> Vec<Result<&str>> {
    let mut labels = Vec::new();
    let mut rest = input;

    while let Some(start) = rest.find(FORMAT_START) {
        let body = &rest[start + FORMAT_START.len()..];
        match body.find(FORMAT_END) {
            Some(end) => {
                labels.push(Ok(&body[..end]));
                rest = &body[end + FORMAT_END.len()..];
            }
            None => {
                labels.push(Err(ParseError::missing(FORMAT_END)));
                break;
            }
        }
    }

    labels
}

/// Parses every `^XA ... ^XZ` format of a document, in order.
///
/// # Errors
///
/// Returns [`ParseError::MissingCommand`] if no format starts or the last one
/// is not terminated, and [`ParseError::InvalidSyntax`] for the first command
/// that cannot be parsed.
pub fn parse_labels(input: &str) -> Result<Vec<Vec<ZplFormatCommand>>> {
    let labels = find_labels(input);
    if labels.is_empty() {
        return Err(ParseError::missing(FORMAT_START));
    }

    labels
        .into_iter()
        .enumerate()
        .map(|(index, body)| {
            let (_, commands) = parse_body(body?)?;
            tracing::debug!(label = index, commands = commands.len(), "parsed format");
            Ok(commands)
        })
        .collect()
}

/// Parses the last `^XA ... ^XZ` format of a document.
///
/// Earlier formats are only located, not parsed; use [`parse_labels`] to get
/// all of them.
///
/// # Errors
///
/// Same as [`parse_labels`], limited to the last format.
pub fn parse_zpl(input: &str) -> Result<Vec<ZplFormatCommand>> {
    let body = find_labels(input)
        .pop()
        .ok_or_else(|| ParseError::missing(FORMAT_START))??;
    let (_, commands) = parse_body(body)?;
    Ok(commands)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::commands::{Justification, Orientation};

    #[test]
    fn parse_body_test() {
        let input = "^PW685
        ^LL236
        ^LS0
        ^FT86,78^A0N,51,51^FD#1001#^FS^XZ";
        let (remain, commands) = parse_body(input).unwrap();
        assert_eq!(remain, "^XZ");
        assert_eq!(
            commands,
            vec![
                ZplFormatCommand::PrintWidth(685),
                ZplFormatCommand::LabelLength(236),
                ZplFormatCommand::LabelShift(0),
                ZplFormatCommand::FieldTypeset {
                    x: 86,
                    y: 78,
                    justification: Justification::Left
                },
                ZplFormatCommand::Font {
                    name: '0',
                    orientation: Orientation::Normal,
                    height: 51,
                    width: 51
                },
                ZplFormatCommand::FieldData("#1001#".to_string()),
                ZplFormatCommand::FieldSeparator
            ]
        )
    }

    #[test]
    fn should_skip_setup_commands_and_comments() {
        let input = "^XA
        ^FX Top section with ^FO inside the comment
        ^MMT^PR4,4^MD10^PQ1,0,1,Y^MNW^MTD
        ^FO10,10^FDok^FS
        ^XZ";
        let commands = parse_zpl(input).unwrap();
        assert_eq!(
            commands,
            vec![
                ZplFormatCommand::FieldOrigin {
                    x: 10,
                    y: 10,
                    justification: Justification::Left
                },
                ZplFormatCommand::FieldData("ok".to_string()),
                ZplFormatCommand::FieldSeparator
            ]
        );
    }

    #[test]
    fn should_accept_empty_format() {
        assert_eq!(parse_zpl("^XA^XZ").unwrap(), Vec::new());
        assert_eq!(parse_zpl("^XA\r\n^XZ\r\n").unwrap(), Vec::new());
    }

    #[test]
    fn should_error_on_missing_xa() {
        let err = parse_zpl("^FDTest^FS").unwrap_err();
        assert_eq!(err, ParseError::missing("^XA"));
    }

    #[test]
    fn should_error_on_missing_xz() {
        let err = parse_zpl("^XA^FDTest^FS").unwrap_err();
        assert_eq!(err, ParseError::missing("^XZ"));
    }

    #[test]
    fn should_error_on_invalid_syntax_command() {
        let err = parse_zpl("^XAInvalidCommand^XZ").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidSyntax {
                near: "InvalidCom".to_string()
            }
        )
    }

    #[test]
    fn should_error_on_unknown_command() {
        let err = parse_zpl("^XA^FT20,20^Unknown^CF0,60^XZ").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidSyntax {
                near: "^Unknown^C".to_string()
            }
        );
    }

    #[test]
    fn parse_zpl_returns_last_format() {
        let input = "^XA^FDfirst^FS^XZ\n^XA^FDsecond^FS^XZ";
        let commands = parse_zpl(input).unwrap();
        assert_eq!(commands[0], ZplFormatCommand::FieldData("second".into()));
    }

    #[test]
    fn parse_labels_returns_all_formats() {
        let input = "^XA^FDfirst^FS^XZ\n^XA^FDsecond^FS^XZ";
        let labels = parse_labels(input).unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0][0], ZplFormatCommand::FieldData("first".into()));
        assert_eq!(labels[1][0], ZplFormatCommand::FieldData("second".into()));
    }

    #[test]
    fn parse_labels_reports_unterminated_last_format() {
        let input = "^XA^FDfirst^FS^XZ^XA^FDsecond^FS";
        assert_eq!(
            parse_labels(input).unwrap_err(),
            ParseError::missing("^XZ")
        );
    }

    #[test]
    fn parse_command_covers_all_groups() {
        for input in [
            "^FO1,2", "^GB10,10,1", "^BY2", "^BCN", "^PW100", "^POI", "^GFA,1,1,1,FF",
        ] {
            assert!(parse_command(input).is_ok(), "{input}");
        }
    }

    proptest! {
        #[test]
        fn parse_never_panics(input in "\\PC*") {
            let _ = parse_labels(&input);
            let _ = parse_zpl(&input);
        }

        #[test]
        fn field_data_survives(text in "[a-zA-Z0-9 #.,:-]{0,40}") {
            let input = format!("^XA^FO0,0^FD{text}^FS^XZ");
            let commands = parse_zpl(&input).unwrap();
            prop_assert_eq!(&commands[1], &ZplFormatCommand::FieldData(text.clone()));
        }
    }
}
