//! Streaming row walker
//!
//! Walks a [`Select`] row by row and hands every row to an ordered list of
//! handlers. State travels in an explicit accumulator passed by `&mut` into
//! each handler call, so nested walks never share hidden mutable state.
//!
//! A handler may start a nested walk through the same [`Walker`] before the
//! outer walk advances. Nesting is bounded, and a nested walk may not reopen
//! a query that is already being walked.

use crate::error::{store_error, JanitorError};
use eavclean_domain::{Row, Select, StreamError, TabularStore};
use std::cell::RefCell;
use std::fmt::Display;

/// Receives each walked row together with the walk's accumulator
pub trait RowHandler<A> {
    /// Handle one row; an error aborts the walk
    fn handle(&mut self, row: &Row, acc: &mut A) -> Result<(), JanitorError>;
}

impl<A, F> RowHandler<A> for F
where
    F: FnMut(&Row, &mut A) -> Result<(), JanitorError>,
{
    fn handle(&mut self, row: &Row, acc: &mut A) -> Result<(), JanitorError> {
        self(row, acc)
    }
}

/// Row walker bound to one store
pub struct Walker<'s, S> {
    store: &'s S,
    max_depth: usize,
    open: RefCell<Vec<Select>>,
}

impl<'s, S> Walker<'s, S>
where
    S: TabularStore,
    S::Error: Display,
{
    /// Create a walker allowing at most `max_depth` nested walks
    pub fn new(store: &'s S, max_depth: usize) -> Self {
        Self {
            store,
            max_depth,
            open: RefCell::new(Vec::new()),
        }
    }

    /// Store this walker reads from
    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Number of walks currently open
    pub fn depth(&self) -> usize {
        self.open.borrow().len()
    }

    /// Walk `query`, presenting each row to every handler in order
    ///
    /// Returns the number of rows walked. A handler error propagates
    /// unchanged; deletes issued by earlier rows stay committed.
    pub fn walk<A>(
        &self,
        query: &Select,
        acc: &mut A,
        handlers: &mut [&mut dyn RowHandler<A>],
    ) -> Result<u64, JanitorError> {
        {
            let open = self.open.borrow();
            if open.len() >= self.max_depth {
                return Err(JanitorError::Walk(format!(
                    "nesting depth {} exceeded while walking {}",
                    self.max_depth, query.table
                )));
            }
            if open.contains(query) {
                return Err(JanitorError::Walk(format!(
                    "query on {} is already being walked",
                    query.table
                )));
            }
        }

        self.open.borrow_mut().push(query.clone());
        let result = self.store.stream(query, |row| {
            for handler in handlers.iter_mut() {
                handler.handle(&row, acc)?;
            }
            Ok::<(), JanitorError>(())
        });
        self.open.borrow_mut().pop();

        match result {
            Ok(rows) => Ok(rows),
            Err(StreamError::Store(e)) => Err(store_error(e)),
            Err(StreamError::Visitor(e)) => Err(e),
        }
    }

    /// Walk `query` with a single handler
    pub fn walk_with<A, F>(&self, query: &Select, acc: &mut A, mut handler: F) -> Result<u64, JanitorError>
    where
        F: FnMut(&Row, &mut A) -> Result<(), JanitorError>,
    {
        self.walk(query, acc, &mut [&mut handler])
    }
}
