use tokio::sync::watch;

/// What a reader currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<T> {
    pub items: Vec<T>,
    /// True until the first fetch settles
    pub loading: bool,
    /// True while a member-requested refresh is running
    pub refreshing: bool,
}

impl<T> ViewState<T> {
    pub fn initial() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            refreshing: false,
        }
    }
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self::initial()
    }
}

/// Owner side of a reader's published state.
pub(crate) struct ViewStore<T> {
    tx: watch::Sender<ViewState<T>>,
}

impl<T: Clone> ViewStore<T> {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(ViewState::initial());
        Self { tx }
    }

    pub(crate) fn state(&self) -> ViewState<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.tx.subscribe()
    }

    pub(crate) fn begin_refresh(&self) {
        self.tx.send_modify(|state| state.refreshing = true);
    }

    pub(crate) fn replace(&self, items: Vec<T>) {
        self.tx.send_replace(ViewState {
            items,
            loading: false,
            refreshing: false,
        });
    }

    /// Settle after a failed fetch, keeping the previous items.
    pub(crate) fn settle(&self) {
        self.tx.send_modify(|state| {
            state.loading = false;
            state.refreshing = false;
        });
    }
}
