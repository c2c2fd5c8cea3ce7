use crate::query::value_as_text;
use crate::{ChangeEvent, ChangeKind, Subscription};

/// Which change notifications a subscriber wants: a table, optionally narrowed
/// to one kind of change and to rows where `column = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub table: String,
    pub kind: Option<ChangeKind>,
    pub column_eq: Option<(String, String)>,
}

impl ChangeFilter {
    /// Every change on `table`
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind: None,
            column_eq: None,
        }
    }

    pub fn on(mut self, kind: ChangeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.column_eq = Some((column.into(), value.into()));
        self
    }

    pub fn matches(&self, event: &ChangeEvent) -> bool {
        if event.table != self.table {
            return false;
        }

        if self.kind.is_some_and(|kind| kind != event.kind) {
            return false;
        }

        match &self.column_eq {
            Some((column, expected)) => event
                .record
                .get(column)
                .and_then(value_as_text)
                .is_some_and(|actual| actual == *expected),
            None => true,
        }
    }
}

/// Change notifications narrowed to a set of filters. Released on drop.
pub struct ChangeSubscription {
    subscription: Subscription<ChangeEvent>,
    filters: Vec<ChangeFilter>,
}

impl ChangeSubscription {
    pub fn new(subscription: Subscription<ChangeEvent>, filters: Vec<ChangeFilter>) -> Self {
        Self {
            subscription,
            filters,
        }
    }

    pub fn filters(&self) -> &[ChangeFilter] {
        &self.filters
    }

    fn wants(&self, event: &ChangeEvent) -> bool {
        self.filters.iter().any(|filter| filter.matches(event))
    }

    /// Next matching change, or None once the gateway is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            let event = self.subscription.recv().await?;
            if self.wants(&event) {
                return Some(event);
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            let event = self.subscription.try_recv()?;
            if self.wants(&event) {
                return Some(event);
            }
        }
    }

    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}
