use anyhow::{bail, Context, Result};
use embedded_graphics::prelude::Point;
use touchcal::CalibrationPoint;

const HEADER: &str = "tap,ms,x,y,raw_x,raw_y";

/// One scripted click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptTap {
    pub ms: u64,
    /// Where the click lands on screen; routed through the scene hit test.
    pub screen: Point,
    /// What the input device reports; `None` simulates a missing device.
    pub raw: Option<CalibrationPoint>,
}

/// Parses `tap,ms,x,y[,raw_x,raw_y]` lines. A raw column of `-` means no
/// input device; omitted raw columns repeat the screen position.
pub fn parse_taps(source: &str) -> Result<Vec<ScriptTap>> {
    let mut taps = Vec::new();
    let mut last_ms = 0u64;
    for (line_no, line) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == HEADER {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts[0] != "tap" {
            bail!("line {line_no}: unknown record '{}'", parts[0]);
        }
        let tap = match parts.len() {
            4 => {
                let screen = parse_point(parts[2], parts[3], line_no)?;
                ScriptTap {
                    ms: parse_field(parts[1], line_no, "ms")?,
                    screen,
                    raw: Some(CalibrationPoint::new(screen.x, screen.y)),
                }
            }
            5 if parts[4] == "-" => ScriptTap {
                ms: parse_field(parts[1], line_no, "ms")?,
                screen: parse_point(parts[2], parts[3], line_no)?,
                raw: None,
            },
            6 => {
                let raw = parse_point(parts[4], parts[5], line_no)?;
                ScriptTap {
                    ms: parse_field(parts[1], line_no, "ms")?,
                    screen: parse_point(parts[2], parts[3], line_no)?,
                    raw: Some(CalibrationPoint::new(raw.x, raw.y)),
                }
            }
            n => bail!("line {line_no}: expected 4, 5 or 6 columns, found {n}"),
        };
        if tap.ms < last_ms {
            bail!("line {line_no}: time goes backwards ({} < {last_ms})", tap.ms);
        }
        last_ms = tap.ms;
        taps.push(tap);
    }
    Ok(taps)
}

/// Non-empty, non-comment lines of an expectation file.
pub fn parse_expected(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

fn parse_point(x: &str, y: &str, line_no: usize) -> Result<Point> {
    Ok(Point::new(
        parse_field(x, line_no, "x")?,
        parse_field(y, line_no, "y")?,
    ))
}

fn parse_field<T>(raw: &str, line_no: usize, field: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("line {line_no}: invalid {field} '{raw}'"))
}
