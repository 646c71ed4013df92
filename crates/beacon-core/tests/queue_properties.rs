//! Property tests for the bounded outbound queue.
//!
//! The queue backs the channel's offline send path, so two invariants must
//! hold for arbitrary traffic: the length never exceeds capacity, and the
//! retained entries are exactly the most recent ones in enqueue order.

use beacon_core::SendQueue;
use beacon_proto::ChannelMessage;
use proptest::prelude::*;

fn numbered(n: usize) -> ChannelMessage {
    ChannelMessage::new(format!("m{n}"))
}

proptest! {
    #[test]
    fn length_never_exceeds_capacity(capacity in 1usize..64, count in 0usize..256) {
        let mut queue = SendQueue::new(capacity);
        for n in 0..count {
            queue.push(numbered(n));
            prop_assert!(queue.len() <= capacity);
        }
    }

    #[test]
    fn retained_entries_are_the_most_recent(capacity in 1usize..32, count in 0usize..128) {
        let mut queue = SendQueue::new(capacity);
        for n in 0..count {
            queue.push(numbered(n));
        }

        let drained: Vec<String> =
            queue.drain().into_iter().map(|m| m.kind).collect();
        let expected: Vec<String> = (count.saturating_sub(capacity)..count)
            .map(|n| format!("m{n}"))
            .collect();

        prop_assert_eq!(drained, expected);
        prop_assert!(queue.is_empty());
    }
}
