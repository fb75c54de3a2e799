//! Thread-local ownership of live tooltip attachments
//!
//! JavaScript only ever holds the teardown function; the attachment itself
//! lives here, keyed by a random id, until that function runs.

use std::cell::RefCell;
use std::collections::HashMap;

use plot_tooltip_engine::{Attachment, TooltipMode};
use serde::Serialize;
use uuid::Uuid;

use crate::host::BrowserHost;

/// What `tooltipInstances()` reports for one attachment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSummary {
    pub id: Uuid,
    pub mode: TooltipMode,
    pub point_count: usize,
    pub dataset_len: usize,
    pub visible: bool,
    pub warnings: usize,
}

thread_local! {
    static TOOLTIP_INSTANCES: RefCell<HashMap<Uuid, Attachment<BrowserHost>>> = RefCell::new(HashMap::new());
}

pub struct InstanceManager;

impl InstanceManager {
    /// Take ownership of `attachment` and return its id
    pub fn register(attachment: Attachment<BrowserHost>) -> Uuid {
        let id = Uuid::new_v4();
        TOOLTIP_INSTANCES.with(|instances| {
            instances.borrow_mut().insert(id, attachment);
        });
        id
    }

    pub fn with_instance<F, R>(id: &Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&Attachment<BrowserHost>) -> R,
    {
        TOOLTIP_INSTANCES.with(|instances| instances.borrow().get(id).map(f))
    }

    pub fn instance_exists(id: &Uuid) -> bool {
        TOOLTIP_INSTANCES.with(|instances| instances.borrow().contains_key(id))
    }

    pub fn instance_count() -> usize {
        TOOLTIP_INSTANCES.with(|instances| instances.borrow().len())
    }

    /// Remove and tear down one attachment; `false` if it was already gone
    pub fn teardown(id: &Uuid) -> bool {
        // Release the borrow before tearing down
        let removed = TOOLTIP_INSTANCES.with(|instances| instances.borrow_mut().remove(id));
        match removed {
            Some(attachment) => {
                attachment.teardown();
                true
            }
            None => false,
        }
    }

    /// Tear down every attachment
    pub fn teardown_all() -> usize {
        let drained: Vec<_> = TOOLTIP_INSTANCES
            .with(|instances| instances.borrow_mut().drain().collect());
        let count = drained.len();
        for (_, attachment) in drained {
            attachment.teardown();
        }
        count
    }

    pub fn summaries() -> Vec<InstanceSummary> {
        TOOLTIP_INSTANCES.with(|instances| {
            instances
                .borrow()
                .iter()
                .map(|(id, attachment)| InstanceSummary {
                    id: *id,
                    mode: attachment.mode(),
                    point_count: attachment.point_count(),
                    dataset_len: attachment.dataset_len(),
                    visible: attachment.is_visible(),
                    warnings: attachment.warnings().len(),
                })
                .collect()
        })
    }
}
