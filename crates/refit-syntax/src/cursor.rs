//! Breadcrumb cursor tracking the path from the unit root to the node
//! currently being visited.
//!
//! The cursor exists for context-sensitive lookups during a traversal (which
//! method am I inside, how deep is this call nested). It is rebuilt for every
//! pass and never retained afterwards; it holds descriptors, not references,
//! so the walker can rebuild the tree while the cursor stays cheap.

/// One step on the path from the unit root to the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Breadcrumb {
    /// Inside a type declaration with the given name.
    Type(String),
    /// Inside a method declaration with the given name.
    Method(String),
    /// Inside the initialiser of a field with the given name.
    Field(String),
    /// Inside a method invocation with the given member name.
    Call(String),
    /// Inside a constructor invocation of the given class reference.
    New(String),
}

/// The path from the unit root to the node currently being visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    frames: Vec<Breadcrumb>,
}

impl Cursor {
    /// Creates an empty cursor positioned at the unit root.
    #[must_use]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub(crate) fn push(&mut self, frame: Breadcrumb) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// Returns the frames from the root outwards.
    #[must_use]
    pub fn frames(&self) -> &[Breadcrumb] {
        &self.frames
    }

    /// Returns the nesting depth of the current node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns the name of the nearest enclosing method, if any.
    #[must_use]
    pub fn enclosing_method(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Breadcrumb::Method(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Returns the name of the nearest enclosing type declaration, if any.
    #[must_use]
    pub fn enclosing_type(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Breadcrumb::Type(name) => Some(name.as_str()),
            _ => None,
        })
    }
}
