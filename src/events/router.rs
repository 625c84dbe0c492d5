use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    document::EventSource,
    error::{Result, RouteError},
    events::{pattern::RoutePattern, Flow, Handler, HandlerFn},
    listener::{self, Subscription},
    location::Location,
};

type UriResolver<E, P> = Arc<dyn Fn(&E, &P) -> String + Send + Sync>;

struct RouteEntry<E, P> {
    handler: Arc<dyn Handler<E, P>>,
    pattern: RoutePattern,
}

impl<E, P> RouteEntry<E, P> {
    fn prefix(&self) -> &str {
        self.pattern.prefix()
    }
}

/// Routes events to handlers by the longest registered prefix of the current
/// URI.
///
/// Entries are kept longest-prefix-first, so when `/a` and `/a/b` both match
/// `/a/b/c` the `/a/b` handler wins. Two different prefixes of equal length can
/// never match the same URI, which makes the scan order total.
pub struct EventMux<E, P> {
    routes: RwLock<Vec<RouteEntry<E, P>>>,
    resolver: RwLock<Option<UriResolver<E, P>>>,
    location: Arc<dyn Location>,
}

impl<E, P> EventMux<E, P> {
    /// The default resolver reads the full href from `location`.
    pub fn new(location: Arc<dyn Location>) -> Self {
        Self {
            routes: RwLock::new(Vec::new()),
            resolver: RwLock::new(None),
            location,
        }
    }

    /// Registers `handler` under `pattern`. A `None` handler is rejected just
    /// like an empty pattern or a prefix that's already taken; none of these
    /// touch the table.
    pub fn register(
        &self,
        pattern: &str,
        handler: Option<Arc<dyn Handler<E, P>>>,
    ) -> std::result::Result<(), RouteError> {
        if pattern.is_empty() {
            return Err(RouteError::EmptyPattern);
        }
        let Some(handler) = handler else {
            return Err(RouteError::MissingHandler(pattern.to_owned()));
        };

        let pattern = RoutePattern::parse(pattern);
        let mut routes = self.routes.write();

        // longest first, then lexicographic
        let pos = routes.partition_point(|entry| {
            let (a, b) = (entry.prefix(), pattern.prefix());
            a.len() > b.len() || (a.len() == b.len() && a < b)
        });
        if routes.get(pos).is_some_and(|entry| entry.prefix() == pattern.prefix()) {
            return Err(RouteError::Duplicate(pattern.prefix().to_owned()));
        }

        tracing::debug!(prefix = pattern.prefix(), params = pattern.params(), "route registered");
        routes.insert(pos, RouteEntry { handler, pattern });
        Ok(())
    }

    pub fn handle<H>(&self, pattern: &str, handler: H) -> std::result::Result<(), RouteError>
    where
        H: Handler<E, P> + 'static,
    {
        self.register(pattern, Some(Arc::new(handler)))
    }

    pub fn handle_fn<F>(&self, pattern: &str, f: F) -> std::result::Result<(), RouteError>
    where
        F: Fn(&E, &P) -> Flow + Send + Sync + 'static,
    {
        self.handle(pattern, HandlerFn(f))
    }

    /// Overrides how the dispatch URI is computed. Last call wins.
    pub fn set_uri_resolver<F>(&self, f: F)
    where
        F: Fn(&E, &P) -> String + Send + Sync + 'static,
    {
        *self.resolver.write() = Some(Arc::new(f));
    }

    pub fn uri(&self, event: &E, payload: &P) -> Result<String> {
        let resolver = self.resolver.read().clone();
        match resolver {
            Some(resolve) => Ok(resolve(event, payload)),
            None => Ok(self.location.current_uri()?),
        }
    }

    /// Invokes the handler with the longest prefix of the current URI.
    /// Returns `Flow::Continue` without calling anything when no route matches.
    pub fn dispatch(&self, event: &E, payload: &P) -> Result<Flow> {
        let uri = self.uri(event, payload)?;
        tracing::debug!(%uri, "dispatching event");

        let handler = self
            .routes
            .read()
            .iter()
            .find(|entry| entry.pattern.matches(&uri))
            .map(|entry| entry.handler.clone());

        Ok(match handler {
            Some(handler) => handler.handle_event(event, payload),
            None => Flow::Continue,
        })
    }

    /// Registered patterns in match order.
    pub fn routes(&self) -> Vec<RoutePattern> {
        self.routes
            .read()
            .iter()
            .map(|entry| entry.pattern.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

impl<E: 'static, P: 'static> EventMux<E, P> {
    /// Binds this router to `event_name` on `source`.
    pub fn listen(
        self: &Arc<Self>,
        source: Arc<dyn EventSource<E, P>>,
        event_name: &str,
    ) -> Subscription<E, P> {
        listener::listen(source, event_name, self.clone())
    }
}

impl<E, P> Handler<E, P> for EventMux<E, P> {
    fn handle_event(&self, event: &E, payload: &P) -> Flow {
        match self.dispatch(event, payload) {
            Ok(flow) => flow,
            Err(err) => {
                tracing::error!(%err, "event dropped");
                Flow::Continue
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;
    use crate::{
        document::Document,
        error::Error,
        events::null_handler,
        location::{FixedLocation, LocationError},
    };

    type Mux = EventMux<(), String>;

    fn by_payload() -> Mux {
        let mux = Mux::new(Arc::new(FixedLocation::new("unused")));
        mux.set_uri_resolver(|_, uri: &String| uri.clone());
        mux
    }

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl Handler<(), String> {
        let log = log.clone();
        HandlerFn(move |_: &(), _: &String| {
            log.lock().unwrap().push(name);
            Flow::Continue
        })
    }

    #[test]
    fn plain_prefix_matches_itself_and_longer_uris() {
        let mux = by_payload();
        let hits = Arc::new(AtomicUsize::new(0));
        mux.handle_fn("/settings", {
            let hits = hits.clone();
            move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
                Flow::Suppress
            }
        })
        .unwrap();

        assert_eq!(mux.dispatch(&(), &"/settings".into()).unwrap(), Flow::Suppress);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert_eq!(mux.dispatch(&(), &"/settingsXYZ".into()).unwrap(), Flow::Suppress);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn parameter_routes_match_on_static_prefix() {
        let mux = by_payload();
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("A/:name", recorder(&log, "a")).unwrap();

        assert_eq!(mux.routes()[0].prefix(), "A");
        assert_eq!(mux.routes()[0].params(), ":name");

        mux.dispatch(&(), &"A".into()).unwrap();
        mux.dispatch(&(), &"ABC/x".into()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "a"]);
    }

    #[test]
    fn longest_prefix_wins() {
        let mux = by_payload();
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("/settings", recorder(&log, "h1")).unwrap();
        mux.handle("/settings/advanced:opt", recorder(&log, "h2")).unwrap();

        mux.dispatch(&(), &"/settings/advanced/page".into()).unwrap();
        mux.dispatch(&(), &"/settings/basic".into()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["h2", "h1"]);

        let prefixes: Vec<_> = mux.routes().iter().map(|r| r.prefix().to_owned()).collect();
        assert_eq!(prefixes, vec!["/settings/advanced", "/settings"]);
    }

    #[test]
    fn order_does_not_depend_on_registration_order() {
        let mux = by_payload();
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("/a/b", recorder(&log, "ab")).unwrap();
        mux.handle("/b", recorder(&log, "b")).unwrap();
        mux.handle("/a", recorder(&log, "a")).unwrap();
        mux.handle("/:any", recorder(&log, "root")).unwrap();

        mux.dispatch(&(), &"/a/b/c".into()).unwrap();
        mux.dispatch(&(), &"/a/c".into()).unwrap();
        mux.dispatch(&(), &"/c".into()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["ab", "a", "root"]);
    }

    #[test]
    fn no_match_continues_without_calling_handlers() {
        let mux = by_payload();
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("/settings", recorder(&log, "h")).unwrap();

        assert_eq!(mux.dispatch(&(), &"/Settings".into()).unwrap(), Flow::Continue);
        assert_eq!(mux.dispatch(&(), &"".into()).unwrap(), Flow::Continue);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn duplicate_static_prefix_is_rejected() {
        let mux = by_payload();
        mux.handle("/users", null_handler()).unwrap();

        assert_eq!(
            mux.handle("/users/:id", null_handler()),
            Err(RouteError::Duplicate("/users".into()))
        );
        assert_eq!(mux.len(), 1);
    }

    #[test]
    fn port_bearing_and_nested_routes_register_side_by_side() {
        let mux = by_payload();
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("http://localhost:8080/settings", recorder(&log, "settings")).unwrap();
        mux.handle("http://localhost:8080/about", recorder(&log, "about")).unwrap();
        mux.handle("/users/:id", recorder(&log, "user")).unwrap();
        mux.handle("/users/:id/edit", recorder(&log, "edit")).unwrap();
        assert_eq!(mux.len(), 4);

        mux.dispatch(&(), &"http://localhost:8080/about/team".into()).unwrap();
        mux.dispatch(&(), &"http://localhost:8080/settings".into()).unwrap();
        mux.dispatch(&(), &"/users/:id/edit/name".into()).unwrap();
        mux.dispatch(&(), &"/users/7".into()).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["about", "settings", "edit", "user"]);
    }

    #[test]
    fn empty_pattern_and_missing_handler_leave_table_untouched() {
        let mux = by_payload();

        assert_eq!(mux.handle("", null_handler()), Err(RouteError::EmptyPattern));
        assert_eq!(
            mux.register("/x", None),
            Err(RouteError::MissingHandler("/x".into()))
        );
        assert!(mux.is_empty());
    }

    #[test]
    fn default_resolver_reads_location() {
        let doc = Arc::new(Document::<(), String>::with_href("http://localhost/app/settings"));
        let mux = Mux::new(doc.clone());
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("http://localhost/app", recorder(&log, "app")).unwrap();

        mux.dispatch(&(), &String::new()).unwrap();
        doc.navigate("http://localhost/other");
        mux.dispatch(&(), &String::new()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["app"]);
    }

    #[test]
    fn location_failure_propagates() {
        let doc = Arc::new(Document::<(), String>::new());
        let mux = Mux::new(doc);
        mux.handle("/", null_handler()).unwrap();

        let err = mux.dispatch(&(), &String::new()).unwrap_err();
        assert!(matches!(err, Error::Location(LocationError::Unavailable)));
        assert_eq!(mux.handle_event(&(), &String::new()), Flow::Continue);
    }

    #[test]
    fn last_resolver_wins() {
        let mux = by_payload();
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("/one", recorder(&log, "one")).unwrap();
        mux.handle("/two", recorder(&log, "two")).unwrap();

        mux.set_uri_resolver(|_, _| "/two".to_owned());
        mux.dispatch(&(), &"/one".into()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["two"]);
    }

    #[test]
    fn listen_routes_fired_events_until_released() {
        let doc = Arc::new(Document::<(), String>::new());
        let mux = Arc::new(by_payload());
        let log = Arc::new(Mutex::new(Vec::new()));
        mux.handle("/a", recorder(&log, "a")).unwrap();

        let mut sub = mux.listen(doc.clone(), "click");
        doc.fire("click", &(), &"/a/1".to_owned());

        sub.unlisten().unwrap();
        assert!(sub.unlisten().is_err());
        doc.fire("click", &(), &"/a/2".to_owned());

        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn handlers_may_register_routes_during_dispatch() {
        let mux = Arc::new(by_payload());
        let weak = Arc::downgrade(&mux);
        mux.handle_fn("/boot", move |_, _| {
            if let Some(mux) = weak.upgrade() {
                let _ = mux.handle("/later", null_handler());
            }
            Flow::Continue
        })
        .unwrap();

        mux.dispatch(&(), &"/boot".into()).unwrap();
        assert_eq!(mux.len(), 2);
    }
}
