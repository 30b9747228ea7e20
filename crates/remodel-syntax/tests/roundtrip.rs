//! Parse → print behaviour on whole files

use pretty_assertions::assert_eq;
use remodel_syntax::{parse, print, Language, ParseError, PrintOptions, QuoteStyle, Stmt};

const COMPONENT: &str = r#"'use client';
import React, { useState } from "react";
import { Button } from '@material-ui/core';

// Counter with a reset button
export default function Counter({ start = 0, label }) {
  const [count, setCount] = useState(start);
  for (let i = 0; i < 3; i++) {
      console.log(i);
  }
  if (count > 10) {
    return null;
  }
  return (
    <div className="counter">
      <span>{label}: {count}</span>
      <Button onClick={() => setCount(count + 1)}>+</Button>
    </div>
  );
}
"#;

fn reformat(source: &str, language: Language) -> String {
    let program = parse(source, language).expect("parse");
    print(&program, &PrintOptions::default()).expect("print")
}

#[test]
fn printing_is_idempotent() {
    let once = reformat(COMPONENT, Language::JavaScript);
    let twice = reformat(&once, Language::JavaScript);
    assert_eq!(once, twice);
}

#[test]
fn printed_file_keeps_structure() {
    let out = reformat(COMPONENT, Language::JavaScript);
    assert!(out.starts_with("'use client';\nimport React, { useState } from 'react';\n"));
    assert!(out.contains("// Counter with a reset button\nexport default function Counter({ start = 0, label }) {"));
    assert!(out.contains("  for (let i = 0; i < 3; i++) {\n    console.log(i);\n  }"));
    assert!(out.contains("<Button onClick={() => setCount(count + 1)}>+</Button>"));
}

#[test]
fn double_quotes_on_request() {
    let program = parse("import a from 'a';\n", Language::JavaScript).expect("parse");
    let options = PrintOptions {
        quote: QuoteStyle::Double,
        ..PrintOptions::default()
    };
    assert_eq!(print(&program, &options).expect("print"), "import a from \"a\";\n");
}

#[test]
fn syntax_errors_carry_position() {
    let err = parse("const ok = 1;\nconst = ;\n", Language::JavaScript).unwrap_err();
    let ParseError::Syntax { line, .. } = err else {
        panic!("expected syntax error, got {err:?}");
    };
    assert_eq!(line, 2);
}

#[test]
fn typescript_components_parse() {
    let program = parse(
        "interface Props { title: string }\nexport class Card extends React.Component<Props> {\n  render(): JSX.Element {\n    return <h1>{this.props.title}</h1>;\n  }\n}\n",
        Language::TypeScript,
    )
    .expect("parse");
    let class = program
        .body
        .iter()
        .find_map(Stmt::as_class)
        .expect("class");
    assert_eq!(class.name.as_deref(), Some("Card"));
    assert_eq!(class.super_type_args.as_deref(), Some("<Props>"));
    assert!(class.has_render());
}
