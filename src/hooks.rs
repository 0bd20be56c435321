//! Chroma Plugin/Hook Registry
//!
//! Named extension points invoked during rendering. Callbacks either
//! transform textual content, fully override default rendering of a node
//! kind, or observe pipeline progress. Registration is append-only within a
//! render session; callback identity is the `Rc` pointer, so registering the
//! same callback twice is a no-op and `unhook` removes by identity.

use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use termcolor::WriteColor;

use crate::errors::ChromaError;
use crate::syntax::Node;

/// The fixed set of extension points in the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    PreRender,
    PostRender,
    PreLine,
    PostLine,
    TransformContent,
    RenderHeading,
    RenderCode,
    RenderQuote,
    RenderList,
    RenderTable,
    RenderHr,
}

impl HookPoint {
    pub const ALL: [HookPoint; 11] = [
        HookPoint::PreRender,
        HookPoint::PostRender,
        HookPoint::PreLine,
        HookPoint::PostLine,
        HookPoint::TransformContent,
        HookPoint::RenderHeading,
        HookPoint::RenderCode,
        HookPoint::RenderQuote,
        HookPoint::RenderList,
        HookPoint::RenderTable,
        HookPoint::RenderHr,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HookPoint::PreRender => "pre_render",
            HookPoint::PostRender => "post_render",
            HookPoint::PreLine => "pre_line",
            HookPoint::PostLine => "post_line",
            HookPoint::TransformContent => "transform_content",
            HookPoint::RenderHeading => "render_heading",
            HookPoint::RenderCode => "render_code",
            HookPoint::RenderQuote => "render_quote",
            HookPoint::RenderList => "render_list",
            HookPoint::RenderTable => "render_table",
            HookPoint::RenderHr => "render_hr",
        }
    }

    /// Resolves a point from its wire name, rejecting anything outside the
    /// fixed enumeration.
    pub fn from_name(name: &str) -> Result<HookPoint, ChromaError> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.name() == name)
            .ok_or_else(|| ChromaError::UnknownHookPoint {
                name: name.to_string(),
            })
    }

    fn kind(&self) -> CallbackKind {
        match self {
            HookPoint::TransformContent => CallbackKind::Transform,
            HookPoint::RenderHeading
            | HookPoint::RenderCode
            | HookPoint::RenderQuote
            | HookPoint::RenderList
            | HookPoint::RenderTable
            | HookPoint::RenderHr => CallbackKind::Render,
            _ => CallbackKind::Notify,
        }
    }
}

/// Explicit override result for render-point callbacks: `Handled` suppresses
/// default rendering of the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Handled,
    NotHandled,
}

impl HookOutcome {
    pub fn handled(&self) -> bool {
        matches!(self, HookOutcome::Handled)
    }
}

pub type TransformFn = dyn Fn(&str) -> String;
pub type RenderFn = dyn Fn(&Node, &mut dyn WriteColor) -> io::Result<HookOutcome>;
pub type NotifyFn = dyn Fn(&Node);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallbackKind {
    Transform,
    Render,
    Notify,
}

/// A registered callback. Clones share identity: equality is `Rc::ptr_eq`.
#[derive(Clone)]
pub enum HookCallback {
    Transform(Rc<TransformFn>),
    Render(Rc<RenderFn>),
    Notify(Rc<NotifyFn>),
}

impl HookCallback {
    pub fn transform(f: impl Fn(&str) -> String + 'static) -> Self {
        HookCallback::Transform(Rc::new(f))
    }

    pub fn render(
        f: impl Fn(&Node, &mut dyn WriteColor) -> io::Result<HookOutcome> + 'static,
    ) -> Self {
        HookCallback::Render(Rc::new(f))
    }

    pub fn notify(f: impl Fn(&Node) + 'static) -> Self {
        HookCallback::Notify(Rc::new(f))
    }

    fn kind(&self) -> CallbackKind {
        match self {
            HookCallback::Transform(_) => CallbackKind::Transform,
            HookCallback::Render(_) => CallbackKind::Render,
            HookCallback::Notify(_) => CallbackKind::Notify,
        }
    }

    fn same(&self, other: &HookCallback) -> bool {
        match (self, other) {
            (HookCallback::Transform(a), HookCallback::Transform(b)) => Rc::ptr_eq(a, b),
            (HookCallback::Render(a), HookCallback::Render(b)) => Rc::ptr_eq(a, b),
            (HookCallback::Notify(a), HookCallback::Notify(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Per-point ordered callback lists, inspectable at runtime.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookPoint, Vec<HookCallback>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` at `point`.
    ///
    /// Fails with `Registration` when the callback kind does not fit the
    /// point (e.g. a transform callback at `render_heading`). Registering
    /// the same callback twice at one point is a no-op.
    pub fn hook(&mut self, point: HookPoint, callback: HookCallback) -> Result<(), ChromaError> {
        if point.kind() != callback.kind() {
            return Err(ChromaError::Registration {
                name: point.name().to_string(),
                reason: format!(
                    "callback kind does not match hook point '{}'",
                    point.name()
                ),
            });
        }
        let entries = self.hooks.entry(point).or_default();
        if entries.iter().any(|existing| existing.same(&callback)) {
            return Ok(());
        }
        entries.push(callback);
        Ok(())
    }

    /// Removes `callback` from `point` by identity. Returns whether anything
    /// was removed.
    pub fn unhook(&mut self, point: HookPoint, callback: &HookCallback) -> bool {
        match self.hooks.get_mut(&point) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|existing| !existing.same(callback));
                entries.len() != before
            }
            None => false,
        }
    }

    pub fn count(&self, point: HookPoint) -> usize {
        self.hooks.get(&point).map_or(0, Vec::len)
    }

    /// Invokes all render-override callbacks at `point`.
    ///
    /// Every callback runs for its side effects; the earliest `Handled`
    /// result controls the outcome.
    pub fn run(
        &self,
        point: HookPoint,
        node: &Node,
        out: &mut dyn WriteColor,
    ) -> io::Result<HookOutcome> {
        let mut outcome = HookOutcome::NotHandled;
        if let Some(entries) = self.hooks.get(&point) {
            for entry in entries {
                if let HookCallback::Render(f) = entry {
                    let result = f(node, out)?;
                    if outcome == HookOutcome::NotHandled {
                        outcome = result;
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// Pipes `content` through every transform callback in registration
    /// order. With none registered the content is returned unchanged.
    pub fn run_transform(&self, content: &str) -> String {
        let mut current = content.to_string();
        if let Some(entries) = self.hooks.get(&HookPoint::TransformContent) {
            for entry in entries {
                if let HookCallback::Transform(f) = entry {
                    current = f(&current);
                }
            }
        }
        current
    }

    /// Fires notification callbacks at `point`.
    pub fn notify(&self, point: HookPoint, node: &Node) {
        if let Some(entries) = self.hooks.get(&point) {
            for entry in entries {
                if let HookCallback::Notify(f) = entry {
                    f(node);
                }
            }
        }
    }
}
