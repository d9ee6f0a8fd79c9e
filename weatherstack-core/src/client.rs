use tracing::{debug, instrument};

use crate::{
    config::Config,
    error::WeatherstackError,
    model::HistoricalResponse,
    request::GetHistoricalWeatherConfig,
    transport::{HttpTransport, Transport},
};

/// Entry point for the historical endpoint.
///
/// Holds nothing but its transport, so one client can serve any number of
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct WeatherstackClient<T = HttpTransport> {
    transport: T,
}

impl WeatherstackClient<HttpTransport> {
    pub fn new(access_key: String) -> Result<Self, WeatherstackError> {
        Ok(Self::with_transport(HttpTransport::new(access_key)?))
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::with_transport(HttpTransport::from_config(config)?))
    }
}

impl<T: Transport> WeatherstackClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch past weather for one day or an inclusive range of at most
    /// [`MAX_DAYS_PER_CALL`](crate::request::MAX_DAYS_PER_CALL) days.
    ///
    /// Range errors are returned before anything is sent. Errors from the
    /// transport are returned as they are.
    #[instrument(
        skip_all,
        fields(query = %config.query, start = %config.start_date, end = ?config.end_date)
    )]
    pub async fn get_historical_weather(
        &self,
        config: &GetHistoricalWeatherConfig,
    ) -> Result<HistoricalResponse, WeatherstackError> {
        let path = config.path()?;
        debug!(%path, "requesting historical weather");

        let url = self.transport.url(&path)?;
        let body = self.transport.get(&url).await?;
        let response: HistoricalResponse = serde_json::from_value(body)?;

        debug!(days = response.historical.len(), "historical weather received");
        Ok(response)
    }
}
