use super::{Children, DisplayHint, Printer, Summary};
use crate::errors::Result;
use crate::memory::value::Value;
use crate::snapshot::Target;

/// `std::stack`, `std::queue` and `std::priority_queue`
///
/// Delegates to the printer of the wrapped container `c`. When no printer
/// matches the container, it is shown as a plain value.
#[derive(Debug)]
pub struct StackOrQueuePrinter {
    name: String,
    container: Value,
    inner: Option<Box<dyn Printer>>,
}

impl StackOrQueuePrinter {
    pub fn new(name: impl Into<String>, container: Value, inner: Option<Box<dyn Printer>>) -> Self {
        StackOrQueuePrinter {
            name: name.into(),
            container,
            inner,
        }
    }
}

impl Printer for StackOrQueuePrinter {
    fn summary(&self, target: &dyn Target) -> Result<Summary> {
        let inner = match &self.inner {
            Some(printer) => printer.summary(target)?,
            None => Summary::Value(self.container.clone()),
        };
        Ok(Summary::Wrapping {
            name: self.name.clone(),
            inner: Box::new(inner),
        })
    }

    fn children<'a>(&'a self, target: &'a dyn Target) -> Result<Option<Children<'a>>> {
        match &self.inner {
            Some(printer) => printer.children(target),
            None => Ok(None),
        }
    }

    fn display_hint(&self) -> Option<DisplayHint> {
        self.inner.as_ref().and_then(|printer| printer.display_hint())
    }
}
