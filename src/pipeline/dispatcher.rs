//! Single-pass fan-out from the record source to the aggregator queues

use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use std::sync::Arc;

use crate::event::ErrorEvent;

/// Consume the source once and forward a copy of every record to each
/// aggregator queue, preserving per-queue arrival order. Dropping the
/// senders on return is the end-of-stream signal: every queue is closed,
/// letting its consumer finish draining.
///
/// A source read error aborts the dispatch immediately and fails the run;
/// the queues still close on the way out, so the consumers terminate, but
/// the caller must not write any report.
pub(crate) fn dispatch<I>(source: I, channels: Vec<Sender<Arc<ErrorEvent>>>) -> Result<usize>
where
    I: IntoIterator<Item = Result<ErrorEvent>>,
{
    let mut forwarded = 0usize;

    for record in source {
        let event = Arc::new(record?);
        for sender in &channels {
            // A receiver only disappears if its aggregator died; that is
            // fatal for the run, not something to paper over.
            sender
                .send(Arc::clone(&event))
                .map_err(|_| anyhow!("aggregator queue closed before end of stream"))?;
        }
        forwarded += 1;
    }

    Ok(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn event(code: &str) -> ErrorEvent {
        ErrorEvent {
            error_code: code.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_every_channel_gets_every_record_in_order() {
        let (tx_a, rx_a) = unbounded();
        let (tx_b, rx_b) = unbounded();

        let source = vec![Ok(event("E1")), Ok(event("E2")), Ok(event("E3"))];
        let forwarded = dispatch(source, vec![tx_a, tx_b]).unwrap();
        assert_eq!(forwarded, 3);

        for rx in [rx_a, rx_b] {
            let codes: Vec<String> = rx.iter().map(|e| e.error_code.clone()).collect();
            assert_eq!(codes, ["E1", "E2", "E3"]);
        }
    }

    #[test]
    fn test_channels_close_after_dispatch() {
        let (tx, rx) = unbounded();
        dispatch(vec![Ok(event("E1"))], vec![tx]).unwrap();
        // One buffered record, then disconnect
        assert!(rx.recv().is_ok());
        assert!(rx.recv().is_err());
    }

    #[test]
    fn test_source_error_aborts_dispatch() {
        let (tx, rx) = unbounded();
        let source: Vec<Result<ErrorEvent>> = vec![
            Ok(event("E1")),
            Err(anyhow!("disk fell over")),
            Ok(event("E2")),
        ];

        let result = dispatch(source, vec![tx]);
        assert!(result.is_err());

        // The record before the failure was forwarded, nothing after it
        let received: Vec<_> = rx.iter().collect();
        assert_eq!(received.len(), 1);
    }
}
