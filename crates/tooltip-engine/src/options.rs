//! Attachment options: accessors, content functions and settings

use std::rc::Rc;

use plot_tooltip_shared::{TooltipError, TooltipResult, TooltipSettings};
use thiserror::Error;

use crate::host::TooltipHost;

/// A user-supplied accessor or content function failed for one record
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct AccessorError(pub String);

impl AccessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// `(record, index) -> value`
pub type Accessor<R, V> = Rc<dyn Fn(&R, usize) -> Result<V, AccessorError>>;

/// `(record, index) -> text or markup`
pub type ContentFn<R> = Rc<dyn Fn(&R, usize) -> Result<String, AccessorError>>;

/// Fallback tooltip text for records without a content function
pub trait DescribeRecord {
    fn describe(&self) -> String;
}

impl DescribeRecord for serde_json::Value {
    fn describe(&self) -> String {
        match self {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::to_string(self).unwrap_or_else(|_| "[object]".to_string())
            }
            other => other.to_string(),
        }
    }
}

impl DescribeRecord for String {
    fn describe(&self) -> String {
        self.clone()
    }
}

impl DescribeRecord for f64 {
    fn describe(&self) -> String {
        self.to_string()
    }
}

impl DescribeRecord for i64 {
    fn describe(&self) -> String {
        self.to_string()
    }
}

/// Everything passed to [`crate::attach`] besides the root and the dataset
pub struct TooltipOptions<H: TooltipHost> {
    pub x: Option<Accessor<H::Record, H::Value>>,
    pub y: Option<Accessor<H::Record, H::Value>>,
    pub text: Option<ContentFn<H::Record>>,
    pub html: Option<ContentFn<H::Record>>,
    /// Event-listening target; defaults to the attachment root
    pub container: Option<H::Node>,
    pub settings: TooltipSettings,
}

impl<H: TooltipHost> Default for TooltipOptions<H> {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            text: None,
            html: None,
            container: None,
            settings: TooltipSettings::default(),
        }
    }
}

impl<H: TooltipHost> TooltipOptions<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(
        mut self,
        accessor: impl Fn(&H::Record, usize) -> Result<H::Value, AccessorError> + 'static,
    ) -> Self {
        self.x = Some(Rc::new(accessor));
        self
    }

    pub fn y(
        mut self,
        accessor: impl Fn(&H::Record, usize) -> Result<H::Value, AccessorError> + 'static,
    ) -> Self {
        self.y = Some(Rc::new(accessor));
        self
    }

    pub fn text(
        mut self,
        content: impl Fn(&H::Record, usize) -> Result<String, AccessorError> + 'static,
    ) -> Self {
        self.text = Some(Rc::new(content));
        self
    }

    pub fn html(
        mut self,
        content: impl Fn(&H::Record, usize) -> Result<String, AccessorError> + 'static,
    ) -> Self {
        self.html = Some(Rc::new(content));
        self
    }

    pub fn container(mut self, container: H::Node) -> Self {
        self.container = Some(container);
        self
    }

    pub fn settings(mut self, settings: TooltipSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Both accessors, neither, or an error naming the missing one
    pub(crate) fn accessor_pair(
        &self,
    ) -> TooltipResult<Option<(Accessor<H::Record, H::Value>, Accessor<H::Record, H::Value>)>>
    {
        match (&self.x, &self.y) {
            (Some(x), Some(y)) => Ok(Some((x.clone(), y.clone()))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(TooltipError::missing_accessor("y")),
            (None, Some(_)) => Err(TooltipError::missing_accessor("x")),
        }
    }
}
