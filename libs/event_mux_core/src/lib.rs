use std::sync::Arc;

/// Outcome of handling an event.
///
/// `Continue` lets the host run its default behaviour and keep propagating the
/// event, `Suppress` asks it to stop. Converts to and from the plain boolean
/// form where `true` means continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flow {
    #[default]
    Continue,
    Suppress,
}

impl Flow {
    pub fn is_continue(self) -> bool {
        matches!(self, Flow::Continue)
    }

    pub fn is_suppress(self) -> bool {
        matches!(self, Flow::Suppress)
    }
}

impl From<bool> for Flow {
    fn from(value: bool) -> Self {
        if value {
            Flow::Continue
        } else {
            Flow::Suppress
        }
    }
}

impl From<Flow> for bool {
    fn from(flow: Flow) -> Self {
        flow.is_continue()
    }
}

pub trait Handler<E, P>: Send + Sync {
    fn handle_event(&self, event: &E, payload: &P) -> Flow;
}

impl<E, P, H> Handler<E, P> for Arc<H>
where
    H: Handler<E, P> + ?Sized,
{
    fn handle_event(&self, event: &E, payload: &P) -> Flow {
        (**self).handle_event(event, payload)
    }
}

impl<E, P, H> Handler<E, P> for Box<H>
where
    H: Handler<E, P> + ?Sized,
{
    fn handle_event(&self, event: &E, payload: &P) -> Flow {
        (**self).handle_event(event, payload)
    }
}

/// Adapts a plain function into a [`Handler`].
#[derive(Clone, Copy)]
pub struct HandlerFn<F>(pub F);

impl<E, P, F> Handler<E, P> for HandlerFn<F>
where
    F: Fn(&E, &P) -> Flow + Send + Sync,
{
    fn handle_event(&self, event: &E, payload: &P) -> Flow {
        (self.0)(event, payload)
    }
}

/// Always continues. Terminates handler chains that shouldn't touch the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHandler;

impl<E, P> Handler<E, P> for NullHandler {
    fn handle_event(&self, _event: &E, _payload: &P) -> Flow {
        Flow::Continue
    }
}

pub fn null_handler() -> NullHandler {
    NullHandler
}
