use proptest::prelude::*;

use pthfill_gcode::{render, splice, GcodeProgram};

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("G28".to_string()),
        Just("T0".to_string()),
        Just("T1".to_string()),
        Just(";TYPE:Wipe tower".to_string()),
        Just(";TYPE:Perimeter".to_string()),
        Just("; objects_info = {\"objects\":[]}".to_string()),
        Just("M104 S215".to_string()),
        Just(String::new()),
        (-1000i32..1000, -1000i32..1000).prop_map(|(x, y)| format!("G1 X{} Y{} E0.5", x, y)),
        "[A-Z ;]{0,12}",
    ]
}

fn program_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec((line(), prop_oneof![Just("\n"), Just("\r\n")]), 1..40),
        any::<bool>(),
    )
        .prop_map(|(lines, terminated)| {
            let mut text: String = lines
                .iter()
                .map(|(line, end)| format!("{}{}", line, end))
                .collect();
            if !terminated {
                text.pop();
            }
            text
        })
}

proptest! {
    #[test]
    fn empty_splice_reproduces_input(text in program_text(), a in 0usize..40, b in 0usize..40) {
        let program = GcodeProgram::parse(&text).unwrap();
        prop_assume!(!program.is_empty());
        let a = a % program.len();
        let b = b % program.len();
        let output = splice(&program, a, b, &[], &[]).unwrap();
        prop_assert_eq!(render(&output), text);
    }

    #[test]
    fn splice_only_adds_lines(text in program_text(), a in 0usize..40, b in 0usize..40) {
        let program = GcodeProgram::parse(&text).unwrap();
        prop_assume!(!program.is_empty());
        let a = a % program.len();
        let b = b % program.len();
        let pause = vec!["M600".to_string(), "M400".to_string()];
        let fill = vec!["G4 P1000".to_string()];

        let output = splice(&program, a, b, &pause, &fill).unwrap();
        let original: Vec<&str> = program.instructions().iter().map(|i| i.raw.as_str()).collect();

        // Dropping the inserted lines must give back the original lines.
        let mut kept = Vec::new();
        let mut iter = output.iter();
        for (index, raw) in original.iter().enumerate() {
            let next = iter.next().unwrap();
            prop_assert_eq!(next.as_str(), *raw);
            kept.push(next.as_str());
            if !raw.ends_with('\n') && (index == a || index == b) {
                prop_assert_eq!(iter.next().unwrap().as_str(), "\n");
            }
            if index == a {
                prop_assert_eq!(iter.next().unwrap().as_str(), "M600\n");
                prop_assert_eq!(iter.next().unwrap().as_str(), "M400\n");
            }
            if index == b {
                prop_assert_eq!(iter.next().unwrap().as_str(), "G4 P1000\n");
            }
        }
        prop_assert!(iter.next().is_none());
        prop_assert_eq!(kept, original);
    }
}

#[test]
fn test_structure_survives_splice() {
    let text = "T0\n;TYPE:Perimeter\nG1 X1 Y1 Z0.2\nT1\n;TYPE:Wipe tower\nG1 X2\n;TYPE:Perimeter\nG1 X3\n";
    let program = GcodeProgram::parse(text).unwrap();
    let output = splice(
        &program,
        3,
        6,
        &["M600".to_string()],
        &["G0 Z5".to_string(), "G0 Z0.2".to_string()],
    )
    .unwrap();

    let spliced = GcodeProgram::parse(&render(&output)).unwrap();
    assert_eq!(spliced.tool_changes().len(), 2);
    assert_eq!(spliced.tool_changes()[1].line_index, 3);
    assert_eq!(spliced.line(4).unwrap().text(), "M600");
    assert_eq!(spliced.line(8).unwrap().text(), "G0 Z5");
    assert_eq!(spliced.last_pose(9).z, Some(0.2));
}
