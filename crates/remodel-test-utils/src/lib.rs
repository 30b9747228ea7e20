//! Testing utilities for the remodel workspace
//!
//! Shared fixtures, parse/print shortcuts and text assertions.

#![allow(missing_docs)]

use remodel_syntax::{is_valid, parse, print, Language, PrintOptions, Program};

/// Function component with one state hook and one mount effect
pub const FUNCTION_COMPONENT: &str =
    "function Foo(){ const [x, setX] = useState(0); useEffect(() => { load(); }, []); return null; }\n";

/// [`FUNCTION_COMPONENT`] after `functional-to-class`
pub const FUNCTION_COMPONENT_AS_CLASS: &str = "class Foo extends React.Component {
  constructor(props) {
    super(props);
    this.state = { x: null };
  }

  componentDidMount() {
    load();
  }

  render() {
    return null;
  }
}
";

/// Custom document without any `next/document` import
pub const DOCUMENT_PAGE: &str = "class MyDocument extends Document {
  render() {
    return (
      <Html>
        <Head />
        <body>
          <Main />
          <NextScript />
        </body>
      </Html>
    );
  }
}

export default MyDocument;
";

/// Class rendering two library components, no `propTypes`
pub const LIBRARY_FORM: &str = "import React from 'react';
import { Button, TextField } from '@material-ui/core';

class Form extends React.Component {
  render() {
    return (
      <div>
        <Button onClick={this.props.onSave}>Save</Button>
        <TextField label=\"Name\" />
      </div>
    );
  }
}

export default Form;
";

/// Props expected for [`LIBRARY_FORM`], in first-use order
pub const LIBRARY_FORM_PROPS: [&str; 9] = [
    "onClick",
    "children",
    "variant",
    "color",
    "disabled",
    "label",
    "value",
    "onChange",
    "margin",
];

/// Page module with a named function export
pub const NAMED_EXPORT_PAGE: &str = "export function Bar() {
  return <div>bar</div>;
}
";

/// Class component that still calls hooks inside `render`
pub const CLASS_WITH_HOOKS: &str = "import React from 'react';

class Timer extends React.Component {
  componentDidMount() {
    this.started = Date.now();
  }

  render() {
    const [ticks, setTicks] = useState(0);
    useEffect(() => {
      const id = setInterval(() => setTicks((t) => t + 1), 1000);
      return () => clearInterval(id);
    }, []);
    return <span>{ticks}</span>;
  }
}

export default Timer;
";

pub fn parse_js(source: &str) -> Program {
    parse(source, Language::JavaScript).unwrap()
}

pub fn print_default(program: &Program) -> String {
    print(program, &PrintOptions::default()).unwrap()
}

/// Parse and print with default options
pub fn reformat(source: &str) -> String {
    print_default(&parse_js(source))
}

pub fn assert_reparses(text: &str) {
    assert!(is_valid(text, Language::JavaScript), "output does not parse:\n{text}");
}

/// Collapse every whitespace run to a single space
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Assert each needle occurs in `haystack`, each after the previous one
pub fn assert_contains_in_order(haystack: &str, needles: &[&str]) {
    let mut rest = haystack;
    for needle in needles {
        match rest.find(needle) {
            Some(at) => rest = &rest[at + needle.len()..],
            None => panic!("expected `{needle}` (in order) in:\n{haystack}"),
        }
    }
}
