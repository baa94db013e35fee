//! Label-wide commands: size, home, shift, reverse and print orientation.

use nom::{
    IResult,
    bytes::complete::tag,
    combinator::opt,
};

use super::params::{next, orientation, signed, unsigned, yes_no};
use crate::commands::{Orientation, ZplFormatCommand};

pub fn parse_pw(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^PW")(input)?;
    let (input, width) = unsigned(input)?;
    Ok((input, ZplFormatCommand::PrintWidth(width)))
}

pub fn parse_ll(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^LL")(input)?;
    let (input, length) = unsigned(input)?;
    Ok((input, ZplFormatCommand::LabelLength(length)))
}

pub fn parse_ls(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^LS")(input)?;
    let (input, shift) = opt(signed)(input)?;
    Ok((input, ZplFormatCommand::LabelShift(shift.unwrap_or(0))))
}

pub fn parse_lh(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^LH")(input)?;
    let (input, x) = opt(signed)(input)?;
    let (input, y) = next(signed)(input)?;
    Ok((
        input,
        ZplFormatCommand::LabelHome {
            x: x.unwrap_or(0),
            y: y.unwrap_or(0),
        },
    ))
}

pub fn parse_lr(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^LR")(input)?;
    let (input, reverse) = opt(yes_no)(input)?;
    Ok((input, ZplFormatCommand::LabelReverse(reverse.unwrap_or(false))))
}

/// `^PO` only knows `N` and `I`; the rotated letters fall back to normal.
pub fn parse_po(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^PO")(input)?;
    let (input, value) = opt(orientation)(input)?;
    let value = match value {
        Some(Orientation::Inverted) => Orientation::Inverted,
        _ => Orientation::Normal,
    };
    Ok((input, ZplFormatCommand::PrintOrientation(value)))
}
