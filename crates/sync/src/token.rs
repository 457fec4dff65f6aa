use tokio_util::sync::CancellationToken;

/// Generation-scoped cancellation token for one feed subscription.
#[derive(Debug, Clone)]
pub(crate) struct SubscriptionToken {
	generation: u64,
	cancel: CancellationToken,
}

impl SubscriptionToken {
	/// Creates a token bound to a store generation.
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// Store generation the subscription feeds.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Requests teardown.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when teardown is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}
