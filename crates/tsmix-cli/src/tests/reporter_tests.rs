use super::*;

fn report() -> Report {
    Report {
        composite: "Composite(Point, Label)".to_string(),
        constructor_args: "[Point: [x: number], Label: []]".to_string(),
        instance_type: "{ label(): string; x: number }".to_string(),
        mixins: vec!["Point".to_string(), "Label".to_string()],
        members: vec![
            MemberRow {
                key: "x".to_string(),
                source: Some(Source::OwnStorage),
                component: Some("Point".to_string()),
                value: "1".to_string(),
                returns: None,
                declared_type: Some("number".to_string()),
                declared_by: Some("Point".to_string()),
            },
            MemberRow {
                key: "label".to_string(),
                source: Some(Source::AuxPrototype(0)),
                component: Some("Label".to_string()),
                value: "[Function label]".to_string(),
                returns: Some("origin".to_string()),
                declared_type: Some("() => string".to_string()),
                declared_by: Some("Label".to_string()),
            },
            MemberRow {
                key: "ghost".to_string(),
                source: None,
                component: None,
                value: "undefined".to_string(),
                returns: None,
                declared_type: None,
                declared_by: None,
            },
        ],
    }
}

#[test]
fn test_render_report_plain() {
    let out = Reporter::new(false).render_report(&report());
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Composite(Point, Label)");
    assert_eq!(lines[1], "  constructor: [Point: [x: number], Label: []]");
    assert_eq!(lines[3], "  mixins:      Point, Label");
    assert_eq!(lines[4], "");
    assert!(lines[5].starts_with("  KEY    SOURCE"), "{}", lines[5]);
    assert!(lines[6].starts_with("  x      own storage"), "{}", lines[6]);
    assert!(lines[7].contains("[Function label] -> origin"), "{}", lines[7]);
    assert!(lines[8].contains("(absent)"), "{}", lines[8]);
    assert!(lines[8].ends_with('-'), "{}", lines[8]);
}

#[test]
fn test_render_findings_summary() {
    let reporter = Reporter::new(false);
    assert_eq!(
        reporter.render_findings(&[]),
        "runtime composite and composite type agree\n"
    );

    let findings = [
        Finding {
            severity: Severity::Error,
            key: "x".to_string(),
            message: "declared by the type but absent at runtime".to_string(),
        },
        Finding {
            severity: Severity::Warning,
            key: "tag".to_string(),
            message: "runtime resolves from `B`".to_string(),
        },
    ];
    let out = reporter.render_findings(&findings);
    assert!(out.starts_with("error x: declared by the type but absent at runtime\n"));
    assert!(out.contains("warning tag: runtime resolves from `B`\n"));
    assert!(out.ends_with("1 error(s), 1 warning(s)\n"));
}

#[test]
fn test_color_only_when_enabled() {
    colored::control::set_override(true);
    let out = Reporter::new(true).render_findings(&[Finding {
        severity: Severity::Error,
        key: "x".to_string(),
        message: "m".to_string(),
    }]);
    colored::control::unset_override();
    assert!(out.contains("\u{1b}["));
}
