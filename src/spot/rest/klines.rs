//! Auto-paginating kline retrieval.
//!
//! A single `klines` call returns at most one page of records, truncated by
//! the request's `limit`. [`stream_klines`] stitches pages into one lazy,
//! chronologically ordered stream over the full requested range: after each
//! page it compares the open time of the last record to the requested end
//! time, and if the gap exceeds one interval the page was truncated, so the
//! stream continues from that open time.
//!
//! The boundary record is re-fetched by the continuation request (start times
//! are inclusive) and withheld from the truncated page, so the stitched
//! stream contains no duplicate open times and no gaps.
//!
//! Pagination is tail-lazy: a page is fetched only when the consumer polls
//! past the previous one, and dropping the stream issues no further requests.

use std::future::Future;

use futures_util::stream::TryStreamExt;
use futures_util::{Stream, stream};

use crate::error::BinanceError;
use crate::spot::rest::SpotRestClient;
use crate::spot::rest::public::{Kline, KlinesRequest};

/// Source of kline pages.
///
/// The seam between pagination and transport: [`SpotRestClient`] is the real
/// source, and tests drive the paginator with synthetic ones.
pub trait KlineSource: Send + Sync {
    /// Fetch one page of klines for the given request.
    fn klines(
        &self,
        request: &KlinesRequest,
    ) -> impl Future<Output = Result<Vec<Kline>, BinanceError>> + Send;
}

impl KlineSource for SpotRestClient {
    async fn klines(&self, request: &KlinesRequest) -> Result<Vec<Kline>, BinanceError> {
        self.get_klines(request).await
    }
}

impl SpotRestClient {
    /// Stream klines over the full requested range, paginating as needed.
    ///
    /// Records arrive in strictly increasing open-time order with no
    /// duplicates across page boundaries. Recomputing the stream from the
    /// same request is idempotent: the underlying calls are read-only GETs
    /// over a fixed time range.
    ///
    /// Any transport error ends the stream after surfacing; records already
    /// yielded stand.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use binance_api_client::spot::rest::SpotRestClient;
    /// use binance_api_client::spot::rest::public::KlinesRequest;
    /// use binance_api_client::types::Interval;
    /// use futures_util::TryStreamExt;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = SpotRestClient::connect().await?;
    ///
    ///     let request = KlinesRequest::new(
    ///         "BTCUSDT",
    ///         Interval::OneHour,
    ///         1_690_000_000_000,
    ///         1_695_000_000_000,
    ///     );
    ///
    ///     let mut stream = std::pin::pin!(client.stream_klines(request));
    ///     while let Some(kline) = stream.try_next().await? {
    ///         println!("{}: {}", kline.open_time, kline.close);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub fn stream_klines(
        &self,
        request: KlinesRequest,
    ) -> impl Stream<Item = Result<Kline, BinanceError>> + '_ {
        stream_klines(self, request)
    }
}

/// Stream klines from any [`KlineSource`], paginating as needed.
///
/// See [`SpotRestClient::stream_klines`] for the contract.
pub fn stream_klines<S>(
    source: &S,
    request: KlinesRequest,
) -> impl Stream<Item = Result<Kline, BinanceError>> + '_
where
    S: KlineSource,
{
    let interval_millis = request.interval.duration_millis();
    stream::try_unfold(Some(request), move |state| async move {
        let Some(request) = state else {
            return Ok::<_, BinanceError>(None);
        };
        let page = source.klines(&request).await?;
        let (records, next) = split_page(page, &request, interval_millis);
        Ok(Some((
            stream::iter(records.into_iter().map(Ok::<_, BinanceError>)),
            next,
        )))
    })
    .try_flatten()
}

/// Decide how much of a page to emit and whether to continue.
///
/// - An empty page ends the stream: no records means no more data.
/// - A singleton page is terminal as-is. There is no way to tell whether data
///   exists beyond a single record without risking an endless one-record
///   loop, since the continuation would start from that same open time.
/// - Otherwise the page is truncated iff the last open time falls more than
///   one interval short of the requested end time; the boundary record is
///   withheld here and re-emitted by the continuation page.
fn split_page(
    mut page: Vec<Kline>,
    request: &KlinesRequest,
    interval_millis: u64,
) -> (Vec<Kline>, Option<KlinesRequest>) {
    if page.len() <= 1 {
        return (page, None);
    }

    let last_open = page
        .last()
        .map(|kline| kline.open_time)
        .unwrap_or(request.end_time);
    let gap = request.end_time.saturating_sub(last_open);

    if gap > interval_millis {
        page.pop();
        (page, Some(request.continue_from(last_open)))
    } else {
        (page, None)
    }
}
