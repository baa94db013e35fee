//! Parameter combinators shared by the command parsers.
//!
//! ZPL parameters are positional and comma separated. Any of them may be
//! left empty (`^BCN,,Y`) or cut off entirely (`^BCN`), so every parameter
//! after the first is parsed as "optional comma, then optional value".

use std::str::FromStr;

use nom::{
    IResult,
    character::complete::{char, digit0, digit1, none_of, one_of},
    combinator::{map, map_opt, map_res, opt, recognize},
    sequence::{pair, preceded, tuple},
};

use crate::commands::Orientation;

/// Unsigned decimal number.
pub(crate) fn unsigned<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, |digits: &str| digits.parse::<T>())(input)
}

/// Decimal number with an optional sign.
pub(crate) fn signed<T: FromStr>(input: &str) -> IResult<&str, T> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), |digits: &str| {
        digits.parse::<T>()
    })(input)
}

/// Decimal fraction such as `2`, `2.` or `2.5`.
pub(crate) fn decimal(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(tuple((digit1, opt(pair(char('.'), digit0))))),
        |digits: &str| digits.parse::<f32>(),
    )(input)
}

/// `Y`/`N` flag.
pub(crate) fn yes_no(input: &str) -> IResult<&str, bool> {
    map(one_of("YNyn"), |c| c.eq_ignore_ascii_case(&'Y'))(input)
}

/// Orientation letter.
pub(crate) fn orientation(input: &str) -> IResult<&str, Orientation> {
    map_opt(one_of("NRIBnrib"), Orientation::from_char)(input)
}

/// A single parameter letter, anything but a separator or command prefix.
pub(crate) fn letter(input: &str) -> IResult<&str, char> {
    none_of(",^~ \t\r\n")(input)
}

/// A parameter that follows a comma; both comma and value may be missing.
pub(crate) fn next<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, Option<O>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    map(opt(preceded(char(','), opt(parser))), Option::flatten)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned() {
        assert_eq!(unsigned::<usize>("236^LS0"), Ok(("^LS0", 236)));
        assert!(unsigned::<usize>("-1").is_err());
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed::<i32>("-30"), Ok(("", -30)));
        assert_eq!(signed::<i32>("+12,"), Ok((",", 12)));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(decimal("2.5,10"), Ok((",10", 2.5)));
        assert_eq!(decimal("3,"), Ok((",", 3.0)));
        assert_eq!(decimal("3.^FS"), Ok(("^FS", 3.0)));
    }

    #[test]
    fn test_next_present_empty_and_missing() {
        let mut height = next(unsigned::<usize>);
        assert_eq!(height(",50,Y"), Ok((",Y", Some(50))));
        assert_eq!(height(",,Y"), Ok((",Y", None)));
        assert_eq!(height("^FD"), Ok(("^FD", None)));
    }

    #[test]
    fn test_letter_rejects_separators() {
        assert_eq!(letter("A,"), Ok((",", 'A')));
        assert!(letter(",A").is_err());
        assert!(letter("^FS").is_err());
    }
}
