//! Single-file execution.
//!
//! A test file's forms are evaluated in order; every check value is
//! classified and reported as it appears. A file that cannot be read,
//! cannot be parsed, or raises an unexpected interpreter error yields
//! exactly one synthetic Error-class outcome, never a suite abort, so
//! the orchestrator always proceeds to the next file.

use std::fs;
use std::path::Path;

use crate::ast::value::Value;
use crate::atoms::{AtomRegistry, OutputSink};
use crate::errors::SourceContext;
use crate::harness::outcome::{Outcome, SourceRef};
use crate::harness::reporter::Reporter;
use crate::runtime::eval::{eval, EvalContext};
use crate::runtime::scope::Scope;
use crate::syntax::parser::line_of;
use crate::syntax::parse;

pub struct FileRunner<'a> {
    registry: &'a AtomRegistry,
    max_depth: usize,
}

impl<'a> FileRunner<'a> {
    pub fn new(registry: &'a AtomRegistry) -> Self {
        Self {
            registry,
            max_depth: 512,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run a test file in a fresh child of `parent`. The child scope is
    /// dropped when the file completes, so nothing the file defines is
    /// visible to any later file.
    pub fn run_isolated(
        &self,
        path: &Path,
        parent: &Scope,
        output: &mut dyn OutputSink,
        reporter: &mut dyn Reporter,
    ) -> Vec<Outcome> {
        let mut scope = parent.child();
        self.run_in(path, &mut scope, output, reporter)
    }

    /// Run a file directly in the given scope. Used for helper, setup,
    /// and teardown files, whose bindings are meant to be shared.
    pub fn run_in(
        &self,
        path: &Path,
        scope: &mut Scope,
        output: &mut dyn OutputSink,
        reporter: &mut dyn Reporter,
    ) -> Vec<Outcome> {
        let context = path.display().to_string();
        let file_label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| context.clone());

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                let outcome = Outcome::synthetic_error(
                    file_label,
                    None,
                    format!("failed to read file: {}", e),
                );
                return self.report_single(&context, outcome, reporter);
            }
        };

        let source = SourceContext::from_file(context.as_str(), text.as_str());
        let nodes = match parse(&text, &source) {
            Ok(nodes) => nodes,
            Err(e) => {
                let line = line_of(&text, e.source_info.primary_span.offset());
                let outcome = Outcome::synthetic_error(
                    file_label,
                    Some(SourceRef {
                        file: context.clone(),
                        line,
                    }),
                    e.to_string(),
                );
                return self.report_single(&context, outcome, reporter);
            }
        };

        let mut ctx =
            EvalContext::new(self.registry, output, source).with_max_depth(self.max_depth);
        let mut outcomes = Vec::new();
        for node in &nodes {
            match eval(node, scope, &mut ctx) {
                Ok(Value::Check(check)) => {
                    let outcome = Outcome::from_check(&check);
                    reporter.on_result(&context, &outcome.label, &outcome);
                    outcomes.push(outcome);
                }
                Ok(_) => {}
                Err(e) => {
                    // Unexpected error: abort this file's remaining forms,
                    // record one synthetic outcome, leave the suite alone.
                    let outcome = Outcome::synthetic_error(
                        file_label,
                        Some(SourceRef {
                            file: context.clone(),
                            line: node.span.line,
                        }),
                        e.to_string(),
                    );
                    reporter.on_result(&context, &outcome.label, &outcome);
                    outcomes.push(outcome);
                    break;
                }
            }
        }
        outcomes
    }

    fn report_single(
        &self,
        context: &str,
        outcome: Outcome,
        reporter: &mut dyn Reporter,
    ) -> Vec<Outcome> {
        reporter.on_result(context, &outcome.label, &outcome);
        vec![outcome]
    }
}
