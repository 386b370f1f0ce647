// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! SVG path data parser using nom
//!
//! Parses the `d` attribute grammar of SVG paths into a flat list of
//! commands. Implicit command repetition is expanded, so `M 0 0 1 0 1 1`
//! yields one move followed by two line commands. Curves are kept as
//! curves; flattening happens in the geometry crate.

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{map, map_res, opt, recognize},
    multi::many1,
    sequence::{pair, preceded, tuple},
    IResult,
};

use crate::error::{Error, Result};

/// A single SVG path command with absolute or relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        to: [f32; 2],
        relative: bool,
    },
    LineTo {
        to: [f32; 2],
        relative: bool,
    },
    HorizontalLineTo {
        x: f32,
        relative: bool,
    },
    VerticalLineTo {
        y: f32,
        relative: bool,
    },
    CubicTo {
        ctrl1: [f32; 2],
        ctrl2: [f32; 2],
        to: [f32; 2],
        relative: bool,
    },
    SmoothCubicTo {
        ctrl2: [f32; 2],
        to: [f32; 2],
        relative: bool,
    },
    QuadraticTo {
        ctrl: [f32; 2],
        to: [f32; 2],
        relative: bool,
    },
    SmoothQuadraticTo {
        to: [f32; 2],
        relative: bool,
    },
    ArcTo {
        radii: [f32; 2],
        /// x axis rotation in degrees
        x_rotation: f32,
        large_arc: bool,
        sweep: bool,
        to: [f32; 2],
        relative: bool,
    },
    Close,
}

/// Parse number: 1, -1.5, .5, 2., 1e-3
fn number(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |s: &str| s.parse::<f32>(),
    )(input)
}

/// Skip whitespace
fn ws(input: &str) -> IResult<&str, ()> {
    map(take_while(|c: char| c.is_ascii_whitespace()), |_| ())(input)
}

/// Separator between arguments: whitespace with at most one comma
fn comma_ws(input: &str) -> IResult<&str, ()> {
    map(tuple((ws, opt(char(',')), ws)), |_| ())(input)
}

/// Argument preceded by an optional separator
fn arg(input: &str) -> IResult<&str, f32> {
    preceded(comma_ws, number)(input)
}

/// Arc flags are single digits and may be packed without separator
fn flag(input: &str) -> IResult<&str, bool> {
    preceded(comma_ws, map(one_of("01"), |c| c == '1'))(input)
}

fn coordinate_pair(input: &str) -> IResult<&str, [f32; 2]> {
    map(pair(arg, arg), |(x, y)| [x, y])(input)
}

/// Repeated argument groups. Every group starts with its own optional
/// separator and consumes at least one number, so the list stops at the
/// next command letter or at the end of input.
fn arguments<'a, O, F>(parser: F) -> impl FnMut(&'a str) -> IResult<&'a str, Vec<O>>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    many1(parser)
}

fn arc_arguments(input: &str) -> IResult<&str, ([f32; 2], f32, bool, bool, [f32; 2])> {
    tuple((coordinate_pair, arg, flag, flag, coordinate_pair))(input)
}

/// Parse one command letter with all its (possibly repeated) argument groups
fn command(input: &str) -> IResult<&str, Vec<PathCommand>> {
    let (input, letter) = preceded(ws, one_of("MmLlHhVvCcSsQqTtAaZz"))(input)?;
    let relative = letter.is_ascii_lowercase();

    match letter.to_ascii_uppercase() {
        'M' => map(arguments(coordinate_pair), |points| {
            points
                .into_iter()
                .enumerate()
                .map(|(i, to)| {
                    if i == 0 {
                        PathCommand::MoveTo { to, relative }
                    } else {
                        PathCommand::LineTo { to, relative }
                    }
                })
                .collect()
        })(input),
        'L' => map(arguments(coordinate_pair), |points| {
            points
                .into_iter()
                .map(|to| PathCommand::LineTo { to, relative })
                .collect()
        })(input),
        'H' => map(arguments(arg), |values| {
            values
                .into_iter()
                .map(|x| PathCommand::HorizontalLineTo { x, relative })
                .collect()
        })(input),
        'V' => map(arguments(arg), |values| {
            values
                .into_iter()
                .map(|y| PathCommand::VerticalLineTo { y, relative })
                .collect()
        })(input),
        'C' => map(
            arguments(tuple((coordinate_pair, coordinate_pair, coordinate_pair))),
            |groups| {
                groups
                    .into_iter()
                    .map(|(ctrl1, ctrl2, to)| PathCommand::CubicTo {
                        ctrl1,
                        ctrl2,
                        to,
                        relative,
                    })
                    .collect()
            },
        )(input),
        'S' => map(arguments(pair(coordinate_pair, coordinate_pair)), |groups| {
            groups
                .into_iter()
                .map(|(ctrl2, to)| PathCommand::SmoothCubicTo { ctrl2, to, relative })
                .collect()
        })(input),
        'Q' => map(arguments(pair(coordinate_pair, coordinate_pair)), |groups| {
            groups
                .into_iter()
                .map(|(ctrl, to)| PathCommand::QuadraticTo { ctrl, to, relative })
                .collect()
        })(input),
        'T' => map(arguments(coordinate_pair), |points| {
            points
                .into_iter()
                .map(|to| PathCommand::SmoothQuadraticTo { to, relative })
                .collect()
        })(input),
        'A' => map(arguments(arc_arguments), |groups| {
            groups
                .into_iter()
                .map(|(radii, x_rotation, large_arc, sweep, to)| PathCommand::ArcTo {
                    radii,
                    x_rotation,
                    large_arc,
                    sweep,
                    to,
                    relative,
                })
                .collect()
        })(input),
        _ => Ok((input, vec![PathCommand::Close])),
    }
}

/// Parse SVG path data into commands.
///
/// The path must start with a move command. Trailing garbage is an error,
/// reported with the byte offset where parsing stopped.
pub fn parse_path_data(data: &str) -> Result<Vec<PathCommand>> {
    let mut commands = Vec::new();
    let mut rest = data;

    loop {
        let (after_ws, _) = ws(rest).map_err(|_| error_at(data, rest, "unexpected input"))?;
        if after_ws.is_empty() {
            break;
        }
        match command(after_ws) {
            Ok((remaining, parsed)) => {
                commands.extend(parsed);
                rest = remaining;
            }
            Err(_) => return Err(error_at(data, after_ws, "expected path command")),
        }
    }

    match commands.first() {
        None => Err(error_at(data, rest, "empty path data")),
        Some(PathCommand::MoveTo { .. }) => Ok(commands),
        Some(_) => Err(Error::SvgPath {
            offset: 0,
            message: "path data must start with a move command".to_string(),
        }),
    }
}

fn error_at(data: &str, rest: &str, message: &str) -> Error {
    Error::SvgPath {
        offset: data.len() - rest.len(),
        message: message.to_string(),
    }
}
