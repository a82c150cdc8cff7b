// Trait implementations over the concrete backend clients.

mod apify;
mod apollo;
mod instantly;
mod slack;

pub use apify::ApifyScraper;
pub use apollo::ApolloEnricher;
pub use instantly::{contact_to_lead, InstantlyDelivery};
pub use slack::SlackNotifier;
