//! Serializer behaviour: modal suppression, parameter elision and the
//! controller-specific special cases.
use gcode_post::preset::MessagePolicy;
use gcode_post::{Command, Config, Node, Operation, RunContext, Serializer};

fn config(modal: bool, repeat: bool) -> Config {
    Config {
        modal,
        repeat_arguments: repeat,
        line_numbers: false,
        output_comments: false,
        tool_change: true,
        tool_length_offset: false,
        ..Default::default()
    }
}

fn serialize(config: &Config, commands: Vec<Command>) -> String {
    let mut ctx = RunContext::new(config);
    let node = Node::from(Operation::new("op", commands));
    Serializer::new(config).serialize(&node, &mut ctx)
}

fn sample_moves() -> Vec<Command> {
    vec![
        Command::new("G0")
            .with('X', 0.0)
            .with('Y', 0.0)
            .with('Z', 10.0)
            .with('F', 0.0),
        Command::new("G1")
            .with('X', 10.0)
            .with('Y', 0.0)
            .with('Z', 10.0)
            .with('F', 100.0),
        Command::new("G1")
            .with('X', 10.0)
            .with('Y', 0.0)
            .with('Z', 10.0)
            .with('F', 100.0),
    ]
}

#[test]
fn test_unchanged_command_produces_no_line() {
    let out = serialize(&config(true, false), sample_moves());
    assert_eq!(out, "G0 X0.000 Y0.000 Z10.000\nG1 X10.000 F100.000\n");
}

#[test]
fn test_mnemonic_kept_without_modal() {
    let out = serialize(&config(false, false), sample_moves());
    assert_eq!(out, "G0 X0.000 Y0.000 Z10.000\nG1 X10.000 F100.000\nG1\n");
}

#[test]
fn test_repeat_restates_every_parameter() {
    let out = serialize(&config(true, true), sample_moves());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "G1 X10.000 Y0.000 Z10.000 F100.000");
    assert_eq!(lines[2], "X10.000 Y0.000 Z10.000 F100.000");
}

#[test]
fn test_differing_mnemonics_always_printed() {
    let out = serialize(
        &config(true, false),
        vec![
            Command::new("G0").with('X', 1.0),
            Command::new("G1").with('X', 2.0),
            Command::new("G0").with('X', 3.0),
        ],
    );
    assert_eq!(out, "G0 X1.000\nG1 X2.000\nG0 X3.000\n");
}

#[test]
fn test_no_feed_on_rapid_moves() {
    for rapid in ["G0", "G00"] {
        let out = serialize(
            &config(false, true),
            vec![Command::new(rapid).with('X', 1.0).with('F', 500.0)],
        );
        assert_eq!(out, format!("{} X1.000\n", rapid));
    }
}

#[test]
fn test_canned_cycles_restate_positions_and_feed() {
    let drill = Command::new("G81")
        .with('X', 5.0)
        .with('Y', 5.0)
        .with('Z', -3.0)
        .with('R', 2.0)
        .with('F', 100.0);

    let out = serialize(&config(true, false), vec![drill.clone(), drill]);
    assert_eq!(
        out,
        "G81 X5.000 Y5.000 Z-3.000 R2.000 F100.000\nX5.000 Y5.000 Z-3.000 R2.000 F100.000\n"
    );
}

#[test]
fn test_state_tracks_parameters_that_were_not_emitted() {
    // G0 swallows F but the value is still remembered
    let out = serialize(
        &config(true, false),
        vec![
            Command::new("G0").with('X', 1.0).with('F', 300.0),
            Command::new("G1").with('X', 2.0).with('F', 300.0),
        ],
    );
    assert_eq!(out, "G0 X1.000\nG1 X2.000\n");
}

#[test]
fn test_spindle_start_is_followed_by_dwell() {
    let spindle = Command::new("M3").with('S', 12000.0);
    let out = serialize(&config(true, false), vec![spindle.clone(), spindle]);
    assert_eq!(out, "M3 S12000\nG04 P5000\nM3 S12000\nG04 P5000\n");
}

#[test]
fn test_spindle_dwell_is_numbered() {
    let config = Config {
        line_numbers: true,
        ..config(false, false)
    };
    let out = serialize(&config, vec![Command::new("M3").with('S', 8000.0)]);
    assert_eq!(out, "N0 M3 S8000\nN1 G04 P5000\n");
}

#[test]
fn test_tool_change_disabled_strips_command() {
    let config = Config {
        tool_change: false,
        ..config(true, false)
    };
    let out = serialize(
        &config,
        vec![
            Command::new("M6").with('T', 2.0),
            Command::new("G0").with('X', 1.0),
        ],
    );
    assert_eq!(out, "G0 X1.000\n");
}

#[test]
fn test_tool_change_block_and_length_offset() {
    let config = Config {
        tool_length_offset: true,
        tool_change_block: "M5\n\nG53 Z-1\n".to_string(),
        ..config(true, false)
    };
    let out = serialize(&config, vec![Command::new("M6").with('T', 2.0)]);
    assert_eq!(out, "M5\nG53 Z-1\nM6 T2 G43 H2\n");
}

#[test]
fn test_length_offset_without_tool_number_is_a_problem() {
    let config = Config {
        tool_length_offset: true,
        ..config(true, false)
    };
    let mut ctx = RunContext::new(&config);
    let node = Node::from(Operation::new("op", vec![Command::new("M6")]));
    let out = Serializer::new(&config).serialize(&node, &mut ctx);

    assert_eq!(out, "M6\n");
    assert_eq!(ctx.problems(), 1);
}

#[test]
fn test_suppressed_comments_leave_state_untouched() {
    let out = serialize(
        &config(true, false),
        vec![
            Command::new("G0").with('X', 1.0),
            Command::new("(finishing pass)"),
            Command::new("G0").with('X', 2.0),
        ],
    );
    assert_eq!(out, "G0 X1.000\nX2.000\n");
}

#[test]
fn test_message_dropped_when_comments_suppressed() {
    let config = config(true, false);
    let mut ctx = RunContext::new(&config);
    let node = Node::from(Operation::new(
        "op",
        vec![
            Command::new("G0").with('X', 1.0),
            Command::new("message"),
            Command::new("G0").with('X', 2.0),
        ],
    ));
    let out = Serializer::new(&config).serialize(&node, &mut ctx);

    assert_eq!(out, "G0 X1.000\nG0 X2.000\n");
    assert_eq!(ctx.warnings(), 1);
}

#[test]
fn test_message_discard_operation_policy() {
    let config = Config {
        message_policy: MessagePolicy::DiscardOperation,
        ..config(true, false)
    };
    let out = serialize(
        &config,
        vec![
            Command::new("G0").with('X', 1.0),
            Command::new("message"),
            Command::new("G0").with('X', 2.0),
        ],
    );
    assert_eq!(out, "G0 X2.000\n");
}

#[test]
fn test_line_numbers_only_on_emitted_lines() {
    let config = Config {
        line_numbers: true,
        line_number_start: 10,
        line_number_step: 10,
        ..config(true, false)
    };
    let mut commands = sample_moves();
    commands.push(Command::new("G1").with('X', 20.0));

    let out = serialize(&config, commands);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "N10 G0 X0.000 Y0.000 Z10.000",
            "N20 G1 X10.000 F100.000",
            "N30 X20.000",
        ]
    );
}

#[test]
fn test_compound_traversal_and_per_operation_state() {
    let config = config(true, false);
    let op = |label: &str| Node::from(Operation::new(label, vec![Command::new("G0").with('X', 1.0)]));
    let tree = Node::Compound {
        label: "Job".to_string(),
        children: vec![
            op("first"),
            Node::Other {
                label: "Stock".to_string(),
            },
            Node::Compound {
                label: "Nested".to_string(),
                children: vec![op("second")],
            },
        ],
    };

    let mut ctx = RunContext::new(&config);
    let out = Serializer::new(&config).serialize(&tree, &mut ctx);
    assert_eq!(out, "G0 X1.000\nG0 X1.000\n");
}

#[test]
fn test_serialization_is_deterministic() {
    let config = Config {
        line_numbers: true,
        ..config(true, false)
    };
    let first = serialize(&config, sample_moves());
    let second = serialize(&config, sample_moves());
    assert_eq!(first, second);
}
