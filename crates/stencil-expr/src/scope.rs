/*
 * scope.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lexical scope tracking for identifier rewriting.
//!
//! A [`ScopeStack`] holds one frame per binding construct currently being
//! walked (loop aliases, slot props, function parameters). A name is bound
//! when any frame on the stack contains it. Each compile owns its own stack.

use std::collections::HashMap;

/// The names introduced by one binding construct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFrame {
    names: Vec<String>,
}

impl ScopeFrame {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut frame = ScopeFrame::default();
        for name in names {
            let name = name.into();
            if !frame.names.contains(&name) {
                frame.names.push(name);
            }
        }
        frame
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Stack of scope frames with O(1) membership checks.
#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
    // name -> number of frames binding it
    counts: HashMap<String, usize>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack::default()
    }

    /// Enter a construct that binds `names`.
    pub fn push_frame<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frame = ScopeFrame::new(names);
        tracing::trace!(names = ?frame.names, depth = self.frames.len() + 1, "Pushed scope frame");
        for name in &frame.names {
            *self.counts.entry(name.clone()).or_insert(0) += 1;
        }
        self.frames.push(frame);
    }

    /// Leave the innermost construct, restoring the previous visibility.
    ///
    /// Popping an empty stack means some pass exited a node it never
    /// entered. That trips a debug assertion; release builds log it and
    /// carry on.
    pub fn pop_frame(&mut self) -> Option<ScopeFrame> {
        let Some(frame) = self.frames.pop() else {
            debug_assert!(false, "scope frame popped without a matching push");
            tracing::warn!("Scope frame popped without a matching push");
            return None;
        };
        for name in &frame.names {
            if let Some(count) = self.counts.get_mut(name) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(name);
                }
            }
        }
        tracing::trace!(names = ?frame.names, depth = self.frames.len(), "Popped scope frame");
        Some(frame)
    }

    /// True if `name` is bound by any frame on the stack.
    pub fn is_bound(&self, name: &str) -> bool {
        self.counts.contains_key(name)
    }

    /// Run `f` with `names` bound, popping the frame afterwards.
    pub fn with_frame<I, S, R>(&mut self, names: I, f: impl FnOnce(&mut Self) -> R) -> R
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_frame(names);
        let result = f(self);
        self.pop_frame();
        result
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
