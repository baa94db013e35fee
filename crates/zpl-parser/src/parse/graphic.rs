//! Graphic commands: boxes, circles, ellipses, diagonals and bitmaps.

use nom::{
    IResult,
    bytes::complete::{tag, take_till},
    character::complete::char,
    combinator::{map_opt, opt},
    sequence::preceded,
};

use super::params::{letter, next, unsigned};
use crate::commands::{Color, CompressionType, DiagonalDirection, GraphicData, ZplFormatCommand};

/// Smallest shape ZPL draws when the size is omitted.
const DEFAULT_SHAPE_SIZE: usize = 3;

/// Highest `^GB` corner rounding degree.
const MAX_ROUNDING: u8 = 8;

/// `^GBw,h,t,c,r`; width and height never go below the border thickness.
pub fn parse_gb(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^GB")(input)?;
    let (input, width) = opt(unsigned::<usize>)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;
    let (input, thickness) = next(unsigned::<usize>)(input)?;
    let (input, color) = next(letter)(input)?;
    let (input, rounding) = next(unsigned::<u8>)(input)?;

    let thickness = thickness.unwrap_or(1).max(1);
    Ok((
        input,
        ZplFormatCommand::GraphicBox {
            width: width.unwrap_or(thickness).max(thickness),
            height: height.unwrap_or(thickness).max(thickness),
            thickness,
            color: Color::from(color),
            rounding: rounding.unwrap_or(0).min(MAX_ROUNDING),
        },
    ))
}

pub fn parse_gc(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^GC")(input)?;
    let (input, diameter) = opt(unsigned::<usize>)(input)?;
    let (input, thickness) = next(unsigned::<usize>)(input)?;
    let (input, color) = next(letter)(input)?;

    Ok((
        input,
        ZplFormatCommand::GraphicCircle {
            diameter: diameter.unwrap_or(DEFAULT_SHAPE_SIZE),
            thickness: thickness.unwrap_or(1).max(1),
            color: Color::from(color),
        },
    ))
}

pub fn parse_ge(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^GE")(input)?;
    let (input, width) = opt(unsigned::<usize>)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;
    let (input, thickness) = next(unsigned::<usize>)(input)?;
    let (input, color) = next(letter)(input)?;

    Ok((
        input,
        ZplFormatCommand::GraphicEllipse {
            width: width.unwrap_or(DEFAULT_SHAPE_SIZE),
            height: height.unwrap_or(DEFAULT_SHAPE_SIZE),
            thickness: thickness.unwrap_or(1).max(1),
            color: Color::from(color),
        },
    ))
}

/// `^GDw,h,t,c,o`; the box defaults to the line thickness.
pub fn parse_gd(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^GD")(input)?;
    let (input, width) = opt(unsigned::<usize>)(input)?;
    let (input, height) = next(unsigned::<usize>)(input)?;
    let (input, thickness) = next(unsigned::<usize>)(input)?;
    let (input, color) = next(letter)(input)?;
    let (input, direction) = next(letter)(input)?;

    let thickness = thickness.unwrap_or(1).max(1);
    Ok((
        input,
        ZplFormatCommand::GraphicDiagonal {
            width: width.unwrap_or(thickness),
            height: height.unwrap_or(thickness),
            thickness,
            color: Color::from(color),
            direction: DiagonalDirection::from(direction),
        },
    ))
}

/// `^GFa,b,c,d,data`; the payload runs up to the next command prefix.
pub fn parse_gf(input: &str) -> IResult<&str, ZplFormatCommand> {
    let (input, _) = tag("^GF")(input)?;
    let (input, compression_type) = map_opt(letter, CompressionType::from_char)(input)?;
    let (input, data_bytes) = preceded(char(','), unsigned::<usize>)(input)?;
    let (input, total_bytes) = preceded(char(','), unsigned::<usize>)(input)?;
    let (input, row_bytes) = preceded(char(','), unsigned::<usize>)(input)?;
    let (input, raw) = preceded(char(','), take_till(|c| c == '^'))(input)?;

    Ok((
        input,
        ZplFormatCommand::GraphicField {
            compression_type,
            data_bytes,
            total_bytes,
            row_bytes,
            data: GraphicData::from_raw(raw),
        },
    ))
}
