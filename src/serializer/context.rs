//! Run Context
//!
//! State shared by everything emitted during one export run: the line number
//! counter and the warning/problem tallies. Created fresh for every run.

use crate::config::Config;

/// Monotonic line number generator
#[derive(Debug, Clone, PartialEq)]
struct LineCounter {
    next: u64,
    step: u64,
}

impl LineCounter {
    fn advance(&mut self) -> u64 {
        let current = self.next;
        self.next = self.next.saturating_add(self.step);
        current
    }
}

/// Per-run mutable state
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    line_numbers: Option<LineCounter>,
    keep_blank_lines: bool,
    lines: usize,
    warnings: usize,
    problems: usize,
}

impl RunContext {
    pub fn new(config: &Config) -> Self {
        let line_numbers = config.line_numbers.then(|| LineCounter {
            next: config.line_number_start,
            step: config.line_number_step.max(1),
        });

        Self {
            line_numbers,
            keep_blank_lines: config.keep_blank_lines,
            lines: 0,
            warnings: 0,
            problems: 0,
        }
    }

    /// Format one physical output line, consuming a line number if enabled
    pub fn line(&mut self, text: &str) -> String {
        self.lines += 1;
        let mut line = match self.line_numbers.as_mut() {
            Some(counter) => format!("N{} {}", counter.advance(), text.trim()),
            None => text.trim().to_string(),
        };
        line.truncate(line.trim_end().len());
        line.push('\n');
        line
    }

    /// Format a literal text block line by line
    pub fn block(&mut self, text: &str) -> String {
        let mut out = String::new();
        for line in text.lines() {
            if !self.keep_blank_lines && line.trim().is_empty() {
                continue;
            }
            out.push_str(&self.line(line));
        }
        out
    }

    /// Number of physical lines produced through this context
    pub fn lines_emitted(&self) -> usize {
        self.lines
    }

    pub fn add_warning(&mut self) {
        self.warnings += 1;
    }

    pub fn add_problem(&mut self) {
        self.problems += 1;
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn problems(&self) -> usize {
        self.problems
    }
}
