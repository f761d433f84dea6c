//! Integration tests for the semantic analyzer

use vino_foundation::{ErrorKind, Token, TokenKind, Violation};
use vino_language::{
    AnalyzerConfig, AnalyzerState, AttributePolicy, ResourcePolicy, Script, SemanticAnalyzer,
    SymbolEntry, SymbolKind, SymbolTable, TokenStream, analyze, parse,
};

use crate::fixtures::{SceneDir, SceneResources, kw, scene, text_type};

fn parse_tokens(tokens: Vec<Token>) -> Script {
    parse(TokenStream::from(tokens)).unwrap()
}

fn persona(identifier: &str, attributes: &[(TokenKind, &str)]) -> Vec<Token> {
    let mut tokens = vec![
        kw(TokenKind::Persona),
        Token::identifier(identifier),
        kw(TokenKind::BraceOpen),
    ];
    for (i, (key, value)) in attributes.iter().enumerate() {
        if i > 0 {
            tokens.push(kw(TokenKind::Comma));
        }
        tokens.push(kw(*key));
        tokens.push(kw(TokenKind::Equals));
        tokens.push(Token::text_line(*value));
    }
    tokens.push(kw(TokenKind::BraceClose));
    tokens.push(kw(TokenKind::Newline));
    tokens
}

fn violation_of(script: &Script, config: &AnalyzerConfig) -> Violation {
    let err = analyze(script, &mut SymbolTable::new(), config).unwrap_err();
    assert!(err.is_semantic(), "expected a semantic error, got {err}");
    err.violation().cloned().unwrap()
}

// =============================================================================
// Speakers
// =============================================================================

#[test]
fn declared_speaker_accepted() {
    let script = parse_tokens(scene("Human", &SceneResources::default()));
    let mut env = SymbolTable::new();
    analyze(&script, &mut env, &AnalyzerConfig::default()).unwrap();

    let human = env.get("Human").unwrap();
    assert_eq!(human.kind, SymbolKind::Persona);
    assert_eq!(human.line, 4);
    assert_eq!(env.personas(), vec!["Human"]);
}

#[test]
fn undeclared_speaker_rejected() {
    for speaker in ["Humanio", "human", "Robot"] {
        let script = parse_tokens(scene(speaker, &SceneResources::default()));
        let err = analyze(&script, &mut SymbolTable::new(), &AnalyzerConfig::default())
            .unwrap_err();
        assert_eq!(err.line(), Some(6));
        assert_eq!(
            err.violation(),
            Some(&Violation::UndeclaredReference {
                identifier: speaker.to_string()
            })
        );
    }
}

#[test]
fn speaker_from_existing_environment() {
    let script = parse_tokens(vec![
        text_type("Narrator"),
        Token::text_line("Once upon a time"),
        kw(TokenKind::Newline),
        kw(TokenKind::Exit),
    ]);
    let mut env = SymbolTable::new();
    env.insert("Narrator", SymbolEntry::variable(0)).unwrap();
    analyze(&script, &mut env, &AnalyzerConfig::default()).unwrap();
}

#[test]
fn speaker_must_be_declared_above() {
    let mut tokens = vec![text_type("Human"), Token::text_line("Hi"), kw(TokenKind::Newline)];
    tokens.extend(persona("Human", &[(TokenKind::Name, "Humanio")]));
    tokens.push(kw(TokenKind::Exit));

    let violation = violation_of(&parse_tokens(tokens), &AnalyzerConfig::default());
    assert!(matches!(violation, Violation::UndeclaredReference { .. }));
}

// =============================================================================
// Persona Declarations
// =============================================================================

#[test]
fn duplicate_persona_cites_both_lines() {
    let mut tokens = persona("Human", &[(TokenKind::Name, "A")]);
    tokens.push(kw(TokenKind::Newline));
    tokens.extend(persona("Human", &[(TokenKind::Name, "B")]));
    let script = parse_tokens(tokens);

    let mut env = SymbolTable::new();
    let err = analyze(&script, &mut env, &AnalyzerConfig::default()).unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert_eq!(
        err.violation(),
        Some(&Violation::DuplicateDeclaration {
            identifier: "Human".into(),
            first_line: 1,
            second_line: 3,
        })
    );
    // The first declaration survives the failure.
    assert_eq!(env.get("Human").unwrap().line, 1);
}

#[test]
fn persona_collides_with_environment() {
    let script = parse_tokens(persona("Human", &[(TokenKind::Name, "A")]));
    let mut env = SymbolTable::new();
    env.insert("Human", SymbolEntry::variable(0)).unwrap();
    let err = analyze(&script, &mut env, &AnalyzerConfig::default()).unwrap_err();
    assert!(matches!(
        err.violation(),
        Some(Violation::DuplicateDeclaration { first_line: 0, .. })
    ));
}

#[test]
fn persona_without_name_rejected() {
    let script = parse_tokens(persona("Human", &[(TokenKind::Path, "./human")]));
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert_eq!(
        violation,
        Violation::MissingAttribute {
            identifier: "Human".into(),
            attribute: "name".into(),
        }
    );
}

#[test]
fn persona_without_name_rejected_whatever_else_is_set() {
    let script = parse_tokens(vec![
        kw(TokenKind::Persona),
        Token::identifier("Human"),
        kw(TokenKind::BraceOpen),
        kw(TokenKind::Path),
        kw(TokenKind::Equals),
        Token::text_line("./human"),
        kw(TokenKind::Comma),
        kw(TokenKind::Foreground),
        kw(TokenKind::Equals),
        Token::text_line("human0.png"),
        kw(TokenKind::Comma),
        Token::identifier("mood"),
        kw(TokenKind::Equals),
        Token::text_line("calm"),
        kw(TokenKind::BraceClose),
        kw(TokenKind::Newline),
        kw(TokenKind::Exit),
    ]);
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert_eq!(
        violation,
        Violation::MissingAttribute {
            identifier: "Human".into(),
            attribute: "name".into(),
        }
    );
}

#[test]
fn empty_foreground_rejected() {
    let script = parse_tokens(persona(
        "Human",
        &[(TokenKind::Name, "Humanio"), (TokenKind::Foreground, "")],
    ));
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert_eq!(
        violation,
        Violation::EmptyResource {
            identifier: Some("Human".into()),
            attribute: "foreground".into(),
        }
    );
}

#[test]
fn empty_text_file_rejected() {
    let script = parse_tokens(vec![
        text_type("text"),
        kw(TokenKind::Equals),
        Token::text_line(""),
        kw(TokenKind::Newline),
        kw(TokenKind::Exit),
    ]);
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert_eq!(
        violation,
        Violation::EmptyResource {
            identifier: None,
            attribute: "text".into(),
        }
    );
}

#[test]
fn empty_path_rejected() {
    let script = parse_tokens(persona(
        "Human",
        &[(TokenKind::Name, "Humanio"), (TokenKind::Path, "")],
    ));
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert!(matches!(
        violation,
        Violation::EmptyResource { ref attribute, .. } if attribute == "path"
    ));
}

#[test]
fn empty_background_rejected() {
    let script = parse_tokens(vec![
        kw(TokenKind::Background),
        kw(TokenKind::Equals),
        Token::text_line(""),
        kw(TokenKind::Newline),
        kw(TokenKind::Exit),
    ]);
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert_eq!(
        violation,
        Violation::EmptyResource {
            identifier: None,
            attribute: "background".into(),
        }
    );
}

#[test]
fn repeated_attribute_rejected() {
    let script = parse_tokens(persona(
        "Human",
        &[(TokenKind::Name, "A"), (TokenKind::Name, "B")],
    ));
    let violation = violation_of(&script, &AnalyzerConfig::default());
    assert!(matches!(violation, Violation::DuplicateAttribute { .. }));
}

#[test]
fn restricted_attributes() {
    let script = parse_tokens(scene("Human", &SceneResources::default()));

    let config = AnalyzerConfig::default().with_attributes(AttributePolicy::restricted(["mood"]));
    let violation = violation_of(&script, &config);
    assert_eq!(
        violation,
        Violation::UnknownAttribute {
            identifier: "Human".into(),
            attribute: "background".into(),
        }
    );

    let config =
        AnalyzerConfig::default().with_attributes(AttributePolicy::restricted(["background"]));
    analyze(&script, &mut SymbolTable::new(), &config).unwrap();
}

#[test]
fn persona_attributes_recorded() {
    let script = parse_tokens(scene("Human", &SceneResources::default()));
    let mut env = SymbolTable::new();
    analyze(&script, &mut env, &AnalyzerConfig::default()).unwrap();

    let human = env.get("Human").unwrap();
    assert_eq!(human.attributes.len(), 4);
}

// =============================================================================
// Environment Invariants
// =============================================================================

#[test]
fn empty_script_leaves_environment_unchanged() {
    let mut env = SymbolTable::new();
    env.insert("Narrator", SymbolEntry::variable(0)).unwrap();
    let before = env.clone();

    analyze(&Script::new(), &mut env, &AnalyzerConfig::default()).unwrap();
    assert_eq!(env, before);

    let blanks = parse_tokens(vec![kw(TokenKind::Newline), kw(TokenKind::Newline)]);
    analyze(&blanks, &mut env, &AnalyzerConfig::default()).unwrap();
    assert_eq!(env, before);
}

#[test]
fn analyzer_lifecycle() {
    let script = parse_tokens(scene("Human", &SceneResources::default()));
    let mut analyzer = SemanticAnalyzer::new(script.clone());
    assert_eq!(analyzer.state(), AnalyzerState::NotRun);

    analyzer.run(false).unwrap();
    assert_eq!(analyzer.state(), AnalyzerState::Completed);

    let err = analyzer.run(false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Internal(_)));

    analyzer.set_symbol_table(SymbolTable::new());
    analyzer.run(true).unwrap();
    assert!(analyzer.into_symbol_table().contains("Human"));
}

#[test]
fn analyzer_failed_state() {
    let script = parse_tokens(scene("Robot", &SceneResources::default()));
    let mut analyzer = SemanticAnalyzer::new(script);
    assert!(analyzer.run(false).is_err());
    assert_eq!(analyzer.state(), AnalyzerState::Failed);
    assert!(analyzer.symbol_table().contains("Human"));
}

// =============================================================================
// Resource Verification
// =============================================================================

#[test]
fn verified_scene_accepted() {
    let dir = SceneDir::new();
    let script = parse_tokens(scene("Human", &dir.resources()));
    let config = AnalyzerConfig::default().with_resources(ResourcePolicy::verify(dir.path()));
    analyze(&script, &mut SymbolTable::new(), &config).unwrap();
}

#[test]
fn missing_background_rejected() {
    let dir = SceneDir::new();
    let resources = SceneResources {
        background: "missing.png",
        ..dir.resources()
    };
    let script = parse_tokens(scene("Human", &resources));
    let config = AnalyzerConfig::default().with_resources(ResourcePolicy::verify(dir.path()));

    let violation = violation_of(&script, &config);
    assert_eq!(
        violation,
        Violation::MissingResource {
            identifier: None,
            attribute: "background".into(),
            path: dir.join("missing.png"),
        }
    );
}

#[test]
fn path_must_be_directory() {
    let dir = SceneDir::new();
    let resources = SceneResources {
        path: "test.png",
        ..dir.resources()
    };
    let script = parse_tokens(scene("Human", &resources));
    let config = AnalyzerConfig::default().with_resources(ResourcePolicy::verify(dir.path()));

    let violation = violation_of(&script, &config);
    assert!(matches!(
        violation,
        Violation::MissingResource { ref attribute, .. } if attribute == "path"
    ));
}

#[test]
fn foreground_resolved_under_path() {
    let dir = SceneDir::new();
    // `test.png` exists at the root but not under `dir/`.
    let resources = SceneResources {
        sprite: "test.png",
        ..dir.resources()
    };
    let script = parse_tokens(scene("Human", &resources));
    let config = AnalyzerConfig::default().with_resources(ResourcePolicy::verify(dir.path()));

    let violation = violation_of(&script, &config);
    assert_eq!(
        violation,
        Violation::MissingResource {
            identifier: Some("Human".into()),
            attribute: "foreground".into(),
            path: dir.join("dir").join("test.png"),
        }
    );
}

#[test]
fn text_file_must_exist() {
    let dir = SceneDir::new();
    let resources = SceneResources {
        text_file: "dir",
        ..dir.resources()
    };
    let script = parse_tokens(scene("Human", &resources));
    let config = AnalyzerConfig::default().with_resources(ResourcePolicy::verify(dir.path()));

    let violation = violation_of(&script, &config);
    assert!(matches!(
        violation,
        Violation::MissingResource { ref attribute, .. } if attribute == "text"
    ));
}
