//! Parser for scripted walks.
//!
//! A script is a comma separated list of steps. `R:10` holds right for ten
//! frames, `UL:3` walks diagonally up-left, a trailing `*` sprints (`D*:4`) and
//! `.:5` idles. `+` and `-` (optionally followed by a count) zoom the camera in
//! or out on a single frame.

use anyhow::{bail, Context, Result};
use wildlands_rendering::FrameInput;

/// Expands a walk script into one input per frame.
pub(crate) fn parse(script: &str) -> Result<Vec<FrameInput>> {
    let mut frames = Vec::new();
    for token in script.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        if let Some(steps) = zoom_steps(token)? {
            frames.push(FrameInput {
                zoom_steps: steps,
                ..FrameInput::default()
            });
            continue;
        }

        let (directions, count) = match token.split_once(':') {
            Some((directions, count)) => (
                directions,
                count
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("invalid frame count in step `{token}`"))?,
            ),
            None => (token, 1),
        };
        let input = movement(directions.trim())
            .with_context(|| format!("invalid directions in step `{token}`"))?;
        frames.extend(std::iter::repeat(input).take(count));
    }
    Ok(frames)
}

fn zoom_steps(token: &str) -> Result<Option<i8>> {
    let (sign, rest) = match token.chars().next() {
        Some('+') => (1, &token[1..]),
        Some('-') => (-1, &token[1..]),
        _ => return Ok(None),
    };
    let magnitude = if rest.is_empty() {
        1
    } else {
        rest.parse::<i8>()
            .with_context(|| format!("invalid zoom step `{token}`"))?
    };
    Ok(Some(sign * magnitude))
}

fn movement(directions: &str) -> Result<FrameInput> {
    let (directions, sprint) = match directions.strip_suffix('*') {
        Some(directions) => (directions, true),
        None => (directions, false),
    };
    if directions.is_empty() {
        bail!("a step needs at least one direction");
    }

    let mut input = FrameInput {
        sprint,
        ..FrameInput::default()
    };
    for direction in directions.chars() {
        match direction.to_ascii_uppercase() {
            'U' => input.vertical = -1,
            'D' => input.vertical = 1,
            'L' => input.horizontal = -1,
            'R' => input.horizontal = 1,
            '.' => {}
            other => bail!("unknown direction `{other}`"),
        }
    }
    Ok(input)
}
