use std::sync::Arc;

use event_mux::{null_handler, Document, EventMux, EventSource, Flow};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct Click {
    id: &'static str,
}

fn main() -> Result<(), event_mux::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let doc = Arc::new(Document::<Click, ()>::with_href("/settings"));
    let mux = Arc::new(EventMux::<Click, ()>::new(doc.clone()));

    mux.handle_fn("/settings", |click: &Click, _: &()| {
        tracing::info!(id = click.id, "settings clicked");
        Flow::Continue
    })?;
    mux.handle_fn("/settings/advanced/:section", |click: &Click, _: &()| {
        tracing::info!(id = click.id, "advanced settings clicked, suppressing default");
        Flow::Suppress
    })?;
    mux.handle("/about", null_handler())?;

    let source: Arc<dyn EventSource<Click, ()>> = doc.clone();
    let mut sub = mux.listen(source, "click");

    doc.fire("click", &Click { id: "general" }, &());
    doc.navigate("/settings/advanced/network");
    let flow = doc.fire("click", &Click { id: "proxy" }, &());
    tracing::info!(?flow, "delivered");

    sub.unlisten()?;
    Ok(())
}
