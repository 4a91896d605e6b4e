use std::sync::Mutex;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const EPOCH: u64 = 1_704_067_200_000u64;
const COUNTER_BITS: u64 = 12;
const SID_BITS: u64 = 6;

#[derive(Debug)]
struct GeneratorState {
    last_ts: u64,
    counter: u64,
}

/// Time-ordered id generator. Ids sort by creation time, so
/// "newest first" is just descending id order.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    state: Mutex<GeneratorState>,
    server_id: u8,
}

impl SnowflakeGenerator {
    pub fn new(server_id: u8) -> Self {
        let max_sid = (1u64 << SID_BITS) - 1;
        assert!(
            (server_id as u64) <= max_sid,
            "server_id {} exceeds max {}",
            server_id,
            max_sid
        );

        Self {
            state: Mutex::new(GeneratorState {
                last_ts: 0,
                counter: 0,
            }),
            server_id,
        }
    }

    fn current_time_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_millis() as u64
    }

    pub fn generate(&self) -> u64 {
        let seq_mask = (1u64 << COUNTER_BITS) - 1;

        let (ts, counter) = loop {
            let mut st = self.state.lock().unwrap();
            let now = Self::current_time_ms().saturating_sub(EPOCH);

            // Clock went backwards: release the lock and wait it out.
            if now < st.last_ts {
                drop(st);
                thread::sleep(Duration::from_millis(1));
                continue;
            }

            if now == st.last_ts {
                if st.counter < seq_mask {
                    st.counter += 1;
                    break (st.last_ts, st.counter);
                }
                // counter exhausted within this millisecond
                drop(st);
                thread::sleep(Duration::from_millis(1));
                continue;
            }

            st.last_ts = now;
            st.counter = 0;
            break (st.last_ts, st.counter);
        };

        (ts << (COUNTER_BITS + SID_BITS))
            | (((self.server_id as u64) & ((1 << SID_BITS) - 1)) << COUNTER_BITS)
            | (counter & seq_mask)
    }

    /// (creation time in epoch seconds, server id, counter)
    pub fn parse(id: u64) -> (f64, u8, u16) {
        let ts = (id >> (COUNTER_BITS + SID_BITS)) + EPOCH;
        let sid = ((id >> COUNTER_BITS) & ((1 << SID_BITS) - 1)) as u8;
        let counter = (id & ((1 << COUNTER_BITS) - 1)) as u16;
        (ts as f64 / 1000.0, sid, counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_increasing() {
        let generator = SnowflakeGenerator::new(3);
        let mut prev = 0u64;
        for _ in 0..5000 {
            let id = generator.generate();
            assert!(id > prev);
            prev = id;
        }
    }

    #[test]
    fn parse_recovers_server_id_and_time() {
        let generator = SnowflakeGenerator::new(17);
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs_f64();
        let id = generator.generate();
        let (ts, sid, _) = SnowflakeGenerator::parse(id);
        assert_eq!(sid, 17);
        assert!((ts - before).abs() < 5.0);
    }
}
