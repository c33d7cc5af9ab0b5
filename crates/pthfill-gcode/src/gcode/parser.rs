//! G-Code line tokenizer
//!
//! Classifies each line into one of the [`InstructionKind`] shapes. Only the
//! words the hole-fill workflow relies on are interpreted; everything else is
//! kept opaque.

use regex::Regex;
use std::sync::OnceLock;

use pthfill_core::{GcodeError, ToolPose};

use super::{Instruction, InstructionKind, MotionMode};

/// Prefix of the slicer's process-phase marker comment
pub const SECTION_MARKER_PREFIX: &str = "TYPE:";

/// Stateless G-Code line tokenizer
#[derive(Debug, Default, Clone, Copy)]
pub struct GcodeParser;

impl GcodeParser {
    /// Create a new tokenizer
    pub fn new() -> Self {
        Self
    }

    /// Tokenize one raw line (terminator included) at the given index
    pub fn parse_line(&self, index: usize, raw: &str) -> Result<Instruction, GcodeError> {
        let kind = classify(index, raw)?;
        Ok(Instruction {
            index,
            raw: raw.to_string(),
            kind,
        })
    }
}

fn classify(index: usize, raw: &str) -> Result<InstructionKind, GcodeError> {
    let text = raw.trim_end_matches(['\n', '\r']).trim_start();

    if let Some(body) = text.strip_prefix(';') {
        return Ok(classify_comment(body));
    }

    let code = remove_comments(text);
    let words = split_words(&code);
    let Some(&(letter, value)) = words.iter().find(|(letter, _)| *letter != 'N') else {
        return Ok(InstructionKind::Other);
    };

    match letter {
        'G' => {
            let Some(mode) = value.parse::<u32>().ok().and_then(MotionMode::from_code) else {
                return Ok(InstructionKind::Other);
            };
            let mut target = ToolPose::new();
            for &(axis, raw_value) in &words {
                let slot = match axis {
                    'X' => &mut target.x,
                    'Y' => &mut target.y,
                    'Z' => &mut target.z,
                    _ => continue,
                };
                *slot = Some(parse_number(index, axis, raw_value)?);
            }
            Ok(InstructionKind::Motion { mode, target })
        }
        'T' => Ok(value
            .parse::<u32>()
            .map(|tool| InstructionKind::ToolSelect { tool })
            .unwrap_or(InstructionKind::Other)),
        'M' if value == "104" || value == "109" => {
            let Some(&(_, s_value)) = words.iter().find(|(letter, _)| *letter == 'S') else {
                return Ok(InstructionKind::Other);
            };
            let tool = words
                .iter()
                .find(|(letter, _)| *letter == 'T')
                .and_then(|(_, t)| t.parse::<u32>().ok());
            Ok(InstructionKind::TemperatureSet {
                celsius: parse_number(index, 'S', s_value)?,
                tool,
                wait: value == "109",
            })
        }
        _ => Ok(InstructionKind::Other),
    }
}

fn classify_comment(body: &str) -> InstructionKind {
    if body.starts_with(SECTION_MARKER_PREFIX) {
        let name = body.split(':').nth(1).unwrap_or_default().trim();
        return InstructionKind::SectionMarker {
            name: name.to_string(),
        };
    }

    if let Some((key, value)) = body.split_once('=') {
        let key = key.trim();
        if !key.is_empty() && !key.contains(char::is_whitespace) {
            return InstructionKind::Setting {
                key: key.to_string(),
                value: value.trim().to_string(),
            };
        }
    }

    InstructionKind::Comment
}

/// Remove trailing `;` and `( )` comments from a code line
fn remove_comments(line: &str) -> String {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COMMENT_REGEX.get_or_init(|| Regex::new(r"[;(].*").expect("invalid regex pattern"));
    regex.replace(line, "").to_string()
}

/// Split a code line into (letter, value) words; letters are upper-cased
fn split_words(code: &str) -> Vec<(char, &str)> {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = WORD_REGEX
        .get_or_init(|| Regex::new(r"([A-Za-z])([^A-Za-z\s]*)").expect("invalid regex pattern"));

    regex
        .captures_iter(code)
        .filter_map(|caps| {
            let letter = caps.get(1)?.as_str().chars().next()?.to_ascii_uppercase();
            Some((letter, caps.get(2)?.as_str()))
        })
        .collect()
}

fn parse_number(index: usize, param: char, raw: &str) -> Result<f64, GcodeError> {
    if raw.is_empty() {
        return Err(GcodeError::InvalidParameter {
            line_number: index,
            param,
            reason: "missing value".to_string(),
        });
    }
    raw.parse::<f64>()
        .map_err(|err| GcodeError::InvalidParameter {
            line_number: index,
            param,
            reason: format!("`{raw}`: {err}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> InstructionKind {
        GcodeParser::new().parse_line(0, raw).unwrap().kind
    }

    #[test]
    fn test_motion_with_axes() {
        assert_eq!(
            kind("G1 X10.5 Y-3 E0.02 F1800\n"),
            InstructionKind::Motion {
                mode: MotionMode::Linear,
                target: ToolPose {
                    x: Some(10.5),
                    y: Some(-3.0),
                    z: None
                }
            }
        );
    }

    #[test]
    fn test_motion_without_spaces_and_padded_code() {
        assert_eq!(
            kind("G00 Z5.2F4200"),
            InstructionKind::Motion {
                mode: MotionMode::Rapid,
                target: ToolPose {
                    x: None,
                    y: None,
                    z: Some(5.2)
                }
            }
        );
    }

    #[test]
    fn test_motion_ignores_trailing_comment() {
        assert_eq!(
            kind("G1 Z0.3 ; lift X99"),
            InstructionKind::Motion {
                mode: MotionMode::Linear,
                target: ToolPose {
                    x: None,
                    y: None,
                    z: Some(0.3)
                }
            }
        );
    }

    #[test]
    fn test_line_number_prefix_is_skipped() {
        assert!(matches!(
            kind("N10 G0 X1 Y2"),
            InstructionKind::Motion { .. }
        ));
    }

    #[test]
    fn test_non_motion_g_codes_are_opaque() {
        assert_eq!(kind("G28 X Y"), InstructionKind::Other);
        assert_eq!(kind("G92 E0"), InstructionKind::Other);
        assert_eq!(kind("G10"), InstructionKind::Other);
    }

    #[test]
    fn test_tool_select() {
        assert_eq!(kind("T1\n"), InstructionKind::ToolSelect { tool: 1 });
        assert_eq!(kind("T0 ; extruder"), InstructionKind::ToolSelect { tool: 0 });
        assert_eq!(kind("TIMELAPSE_TAKE_FRAME"), InstructionKind::Other);
        assert_eq!(
            kind("M104 T1 S200"),
            InstructionKind::TemperatureSet {
                celsius: 200.0,
                tool: Some(1),
                wait: false
            }
        );
    }

    #[test]
    fn test_temperature_set() {
        assert_eq!(
            kind("M109 S215"),
            InstructionKind::TemperatureSet {
                celsius: 215.0,
                tool: None,
                wait: true
            }
        );
        assert_eq!(kind("M104"), InstructionKind::Other);
    }

    #[test]
    fn test_section_marker() {
        assert_eq!(
            kind(";TYPE:Wipe tower\n"),
            InstructionKind::SectionMarker {
                name: "Wipe tower".to_string()
            }
        );
        assert_eq!(
            kind(";TYPE:External perimeter\r\n"),
            InstructionKind::SectionMarker {
                name: "External perimeter".to_string()
            }
        );
    }

    #[test]
    fn test_setting_and_comment() {
        assert_eq!(
            kind("; objects_info = {\"objects\":[]}\n"),
            InstructionKind::Setting {
                key: "objects_info".to_string(),
                value: "{\"objects\":[]}".to_string()
            }
        );
        assert_eq!(kind("; generated by a slicer"), InstructionKind::Comment);
        assert_eq!(kind(";LAYER_CHANGE"), InstructionKind::Comment);
        assert_eq!(kind(""), InstructionKind::Other);
    }

    #[test]
    fn test_malformed_axis_value_is_an_error() {
        let err = GcodeParser::new().parse_line(7, "G1 X1.2.3 Y4").unwrap_err();
        assert!(matches!(
            err,
            GcodeError::InvalidParameter {
                line_number: 7,
                param: 'X',
                ..
            }
        ));

        let err = GcodeParser::new().parse_line(2, "G0 Z").unwrap_err();
        assert!(matches!(err, GcodeError::InvalidParameter { param: 'Z', .. }));
    }
}
