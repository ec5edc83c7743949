//! Action body hooks
//!
//! Extensions register [`ActionBodyHook`]s on a manager to add fields to
//! action requests. Every registered hook runs once per action, in
//! registration order, after the `{action: info}` body is built and before
//! it is sent.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Fixed points in request construction where hooks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    ModifyBodyForAction,
}

impl HookPoint {
    pub fn name(self) -> &'static str {
        match self {
            HookPoint::ModifyBodyForAction => "modify_body_for_action",
        }
    }
}

/// Mutates an action body in place
pub trait ActionBodyHook: Send + Sync {
    fn modify_body(&self, body: &mut Map<String, Value>);
}

impl<F> ActionBodyHook for F
where
    F: Fn(&mut Map<String, Value>) + Send + Sync,
{
    fn modify_body(&self, body: &mut Map<String, Value>) {
        self(body)
    }
}

#[derive(Clone, Default)]
pub struct Hooks {
    modify_body_for_action: Vec<Arc<dyn ActionBodyHook>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, point: HookPoint, hook: Arc<dyn ActionBodyHook>) {
        match point {
            HookPoint::ModifyBodyForAction => self.modify_body_for_action.push(hook),
        }
    }

    pub fn len(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::ModifyBodyForAction => self.modify_body_for_action.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modify_body_for_action.is_empty()
    }

    pub(crate) fn run_modify_body_for_action(&self, body: &mut Map<String, Value>) {
        if self.modify_body_for_action.is_empty() {
            return;
        }
        tracing::debug!(
            "Running {} {} hook(s)",
            self.modify_body_for_action.len(),
            HookPoint::ModifyBodyForAction.name()
        );
        for hook in &self.modify_body_for_action {
            hook.modify_body(body);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("modify_body_for_action", &self.modify_body_for_action.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn hooks_run_in_registration_order() {
        let mut hooks = Hooks::new();
        hooks.register(
            HookPoint::ModifyBodyForAction,
            Arc::new(|body: &mut Map<String, Value>| {
                body.insert("order".into(), json!(["first"]));
            }),
        );
        hooks.register(
            HookPoint::ModifyBodyForAction,
            Arc::new(|body: &mut Map<String, Value>| {
                if let Some(Value::Array(order)) = body.get_mut("order") {
                    order.push(json!("second"));
                }
            }),
        );

        let mut body = Map::new();
        hooks.run_modify_body_for_action(&mut body);

        assert_eq!(body["order"], json!(["first", "second"]));
        assert_eq!(hooks.len(HookPoint::ModifyBodyForAction), 2);
    }

    #[test]
    fn each_hook_runs_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut hooks = Hooks::new();
        hooks.register(
            HookPoint::ModifyBodyForAction,
            Arc::new(move |_: &mut Map<String, Value>| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );

        hooks.run_modify_body_for_action(&mut Map::new());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hook_point_names() {
        assert_eq!(HookPoint::ModifyBodyForAction.name(), "modify_body_for_action");
        assert!(Hooks::new().is_empty());
    }
}
