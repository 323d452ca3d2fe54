//! Single-slot, single-flight token cache.

// std
use std::future::Future;
// crates.io
use tokio::sync::watch;
// self
use crate::{_prelude::*, token::Token};

type FlightResult = Result<Token>;

/// Handle onto an in-flight or completed token computation.
///
/// Clones observe the same computation. The marker gives each installed computation a distinct
/// identity, so eviction with a stale handle never disturbs a newer occupant.
#[derive(Clone)]
pub(crate) struct Flight {
	receiver: watch::Receiver<Option<FlightResult>>,
	marker: Arc<()>,
}
impl Flight {
	/// Waits for the computation to publish its result.
	///
	/// Dropping the returned future detaches this waiter only; the computation keeps running for
	/// everyone else.
	pub(crate) async fn wait(&self) -> FlightResult {
		let mut receiver = self.receiver.clone();
		let guard =
			receiver.wait_for(Option::is_some).await.map_err(|_| Error::Interrupted)?;

		match &*guard {
			Some(result) => result.clone(),
			None => Err(Error::Interrupted),
		}
	}

	fn same_as(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.marker, &other.marker)
	}
}

/// Compute-once slot holding at most one token computation at a time.
///
/// The first caller to find the slot empty installs a computation; everyone arriving while it is
/// occupied receives a handle onto the same computation. A failed computation evicts itself
/// before publishing, so errors are broadcast to the waiters of that flight but never cached.
#[derive(Default)]
pub(crate) struct TokenCache {
	slot: Mutex<Option<Flight>>,
}
impl TokenCache {
	/// Returns the occupying flight, installing one from `factory` if the slot is empty.
	///
	/// `factory` runs on a spawned task, so a waiter abandoning its [`Flight::wait`] future never
	/// aborts the computation for the others.
	pub(crate) fn get_or_install<F, Fut>(self: &Arc<Self>, factory: F) -> Flight
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = FlightResult> + Send + 'static,
	{
		let mut slot = self.slot.lock();

		if let Some(flight) = &*slot {
			return flight.clone();
		}

		let (sender, receiver) = watch::channel(None);
		let flight = Flight { receiver, marker: Arc::new(()) };
		let computation = factory();

		*slot = Some(flight.clone());

		drop(slot);

		let cache = self.clone();
		let handle = flight.clone();

		tokio::spawn(async move {
			let result = computation.await;

			if result.is_err() {
				cache.evict(&handle);
			}

			// Waiters hold receiver clones, so this only fails once every caller has walked away.
			let _ = sender.send(Some(result));
		});

		flight
	}

	/// Clears the slot if `flight` is still its occupant; stale handles are ignored.
	pub(crate) fn evict(&self, flight: &Flight) {
		let mut slot = self.slot.lock();

		if slot.as_ref().is_some_and(|current| current.same_as(flight)) {
			*slot = None;
		}
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("occupied", &self.slot.lock().is_some())
			.finish()
	}
}
