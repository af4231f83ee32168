//! Parser for the text printed by `ninja -t query <target>`.
//!
//! The output for a single node looks like:
//!
//! ```text
//! foo.o:
//!   input: cc
//!     foo.c
//!     foo.h
//!   output: link
//!     foo
//! ```
//!
//! The `input:` section is absent for source files and there may be any
//! number of `output:` sections, one per edge that consumes the node.

use std::iter::Peekable;

use serde::Serialize;

use crate::error::MalformedOutput;

const INPUT_MARKER: &str = "  input:";
const INPUT_PREFIX: &str = "  input: ";
const OUTPUT_PREFIX: &str = "  output: ";
const CONTINUATION_INDENT: &str = "    ";

/// One node of the build graph as described by the query tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRecord {
    pub name: String,
    /// The rule of the edge that produces this node, if any.
    pub producing_rule: Option<String>,
    /// Inputs of the producing edge.  Always empty when `producing_rule` is
    /// `None`.
    pub inputs: Vec<String>,
    pub outputs: Vec<OutputGroup>,
}

/// An edge that consumes the node, named by its rule, along with everything
/// that edge produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputGroup {
    pub consuming_rule: String,
    pub dependents: Vec<String>,
}

/// Lines of the block paired with their 1-based line numbers.
struct Lines<'a> {
    inner: Peekable<Box<dyn Iterator<Item = (usize, &'a str)> + 'a>>,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Lines<'a> {
        // The tool ends its output with a newline; anything after the last
        // non-blank line is not part of the block.
        let numbered: Box<dyn Iterator<Item = (usize, &'a str)> + 'a> = Box::new(
            text.trim_end()
                .lines()
                .enumerate()
                .map(|(i, line)| (i + 1, line)),
        );
        Lines {
            inner: numbered.peekable(),
        }
    }

    fn peek_starts_with(&mut self, prefix: &str) -> bool {
        matches!(self.inner.peek(), Some((_, line)) if line.starts_with(prefix))
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.inner.next()
    }

    /// Pop the run of indented continuation lines that follows a section
    /// header.
    fn take_continuations(&mut self) -> Vec<String> {
        let mut names = vec![];
        while self.peek_starts_with(CONTINUATION_INDENT) {
            if let Some((_, line)) = self.inner.next() {
                names.push(line.trim().to_string());
            }
        }
        names
    }
}

fn malformed(line_number: usize, line: &str, expected: &'static str) -> MalformedOutput {
    MalformedOutput {
        line_number,
        line: line.to_string(),
        expected,
    }
}

/// Strip `prefix` from a section header, insisting on a non-empty rule name.
fn section_rule(
    line_number: usize,
    line: &str,
    prefix: &str,
    expected: &'static str,
) -> Result<String, MalformedOutput> {
    match line.strip_prefix(prefix) {
        Some(rule) if !rule.trim().is_empty() => Ok(rule.trim().to_string()),
        _ => Err(malformed(line_number, line, expected)),
    }
}

pub fn parse(text: &str) -> Result<NodeRecord, MalformedOutput> {
    let mut lines = Lines::new(text);

    let name = match lines.next() {
        None => return Err(malformed(0, "", "a node name")),
        Some((line_number, line)) => match line.strip_suffix(':') {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(malformed(
                    line_number,
                    line,
                    "a node name followed by a colon",
                ))
            }
        },
    };

    let mut producing_rule = None;
    let mut inputs = vec![];
    if lines.peek_starts_with(INPUT_MARKER) {
        if let Some((line_number, line)) = lines.next() {
            producing_rule = Some(section_rule(
                line_number,
                line,
                INPUT_PREFIX,
                "`  input: <rule>`",
            )?);
            inputs = lines.take_continuations();
        }
    }

    let mut outputs = vec![];
    while let Some((line_number, line)) = lines.next() {
        let consuming_rule = section_rule(line_number, line, OUTPUT_PREFIX, "`  output: <rule>`")?;
        let dependents = lines.take_continuations();
        outputs.push(OutputGroup {
            consuming_rule,
            dependents,
        });
    }

    Ok(NodeRecord {
        name,
        producing_rule,
        inputs,
        outputs,
    })
}
