// Register tables: ordered (register, payload) writes pushed to a chip
// at init. Each entry is one I2C write transaction [reg, data..].
// Payloads are 1 or 2 bytes (both chips on this board top out at 16-bit
// registers); longer entries fail to build in const context.

use embedded_hal::i2c::I2c;

pub const MAX_PAYLOAD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegWrite {
    pub reg: u8,
    pub data: &'static [u8],
}

impl RegWrite {
    pub const fn new(reg: u8, data: &'static [u8]) -> Self {
        assert!(
            !data.is_empty() && data.len() <= MAX_PAYLOAD,
            "register payload must be 1 or 2 bytes"
        );
        Self { reg, data }
    }

    /// Serialize into `buf`, returning the number of bytes used.
    pub fn encode(&self, buf: &mut [u8; MAX_PAYLOAD + 1]) -> usize {
        buf[0] = self.reg;
        buf[1..=self.data.len()].copy_from_slice(self.data);
        self.data.len() + 1
    }
}

/// Write every entry of `table` in order. Stops at the first bus error.
pub fn write_table<I: I2c>(i2c: &mut I, addr: u8, table: &[RegWrite]) -> Result<(), I::Error> {
    let mut buf = [0u8; MAX_PAYLOAD + 1];
    for entry in table {
        let len = entry.encode(&mut buf);
        i2c.write(addr, &buf[..len])?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fake {
    // Register-file fake shared by the driver tests. Writes land in
    // `regs` (auto-incrementing for multi-byte payloads) and are also
    // journaled so tests can assert on exact transaction order.

    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BusFault;

    impl embedded_hal::i2c::Error for BusFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    pub struct FakeBus {
        pub addr: u8,
        pub regs: [u8; 256],
        pub writes: std::vec::Vec<std::vec::Vec<u8>>,
        /// Per-register read overrides for registers that stream
        /// (same register address returns successive values).
        pub stream: std::collections::HashMap<u8, std::collections::VecDeque<u8>>,
        pub fail_after: Option<usize>,
        /// Fail only the transaction with this index; later ones succeed.
        pub fail_once: Option<usize>,
        ops: usize,
    }

    impl FakeBus {
        pub fn new(addr: u8) -> Self {
            Self {
                addr,
                regs: [0; 256],
                writes: std::vec::Vec::new(),
                stream: std::collections::HashMap::new(),
                fail_after: None,
                fail_once: None,
                ops: 0,
            }
        }

        pub fn set(&mut self, reg: u8, bytes: &[u8]) {
            for (i, b) in bytes.iter().enumerate() {
                self.regs[reg.wrapping_add(i as u8) as usize] = *b;
            }
        }

        pub fn push_stream(&mut self, reg: u8, bytes: &[u8]) {
            self.stream.entry(reg).or_default().extend(bytes.iter().copied());
        }

        pub fn wrote(&self, bytes: &[u8]) -> bool {
            self.writes.iter().any(|w| w.as_slice() == bytes)
        }

        pub fn position(&self, bytes: &[u8]) -> Option<usize> {
            self.writes.iter().position(|w| w.as_slice() == bytes)
        }
    }

    impl ErrorType for FakeBus {
        type Error = BusFault;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if address != self.addr {
                return Err(BusFault);
            }
            if let Some(limit) = self.fail_after
                && self.ops >= limit
            {
                return Err(BusFault);
            }
            if self.fail_once == Some(self.ops) {
                self.ops += 1;
                return Err(BusFault);
            }
            self.ops += 1;

            let mut pointer: u8 = 0;
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        self.writes.push(bytes.to_vec());
                        if let Some((&reg, payload)) = bytes.split_first() {
                            pointer = reg;
                            for (i, b) in payload.iter().enumerate() {
                                self.regs[reg.wrapping_add(i as u8) as usize] = *b;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        if let Some(queue) = self.stream.get_mut(&pointer) {
                            for slot in buf.iter_mut() {
                                *slot = queue.pop_front().unwrap_or(0);
                            }
                        } else {
                            for (i, slot) in buf.iter_mut().enumerate() {
                                *slot = self.regs[pointer.wrapping_add(i as u8) as usize];
                            }
                        }
                    }
                }
            }
            Ok(())
        }
    }

    pub struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    /// Keeps every millisecond wait so tests can check settle times.
    #[derive(Default)]
    pub struct RecordingDelay {
        pub ms: std::vec::Vec<u32>,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.ms.push(ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeBus;
    use super::*;

    const TABLE: &[RegWrite] = &[
        RegWrite::new(0x06, &[0x14]),
        RegWrite::new(0x66, &[0x5E, 0xD0]),
        RegWrite::new(0x25, &[0x0A]),
    ];

    #[test]
    fn table_is_written_in_order_one_transaction_per_entry() {
        let mut bus = FakeBus::new(0x48);
        write_table(&mut bus, 0x48, TABLE).unwrap();

        assert_eq!(bus.writes.len(), 3);
        assert_eq!(bus.writes[0], [0x06, 0x14]);
        assert_eq!(bus.writes[1], [0x66, 0x5E, 0xD0]);
        assert_eq!(bus.writes[2], [0x25, 0x0A]);
    }

    #[test]
    fn first_bus_error_stops_the_table() {
        let mut bus = FakeBus::new(0x48);
        bus.fail_after = Some(1);

        assert!(write_table(&mut bus, 0x48, TABLE).is_err());
        assert_eq!(bus.writes.len(), 1);
    }

    #[test]
    #[should_panic(expected = "register payload must be 1 or 2 bytes")]
    fn oversized_payload_is_rejected() {
        let data: &'static [u8] = &[0x01, 0x02, 0x03];
        let _ = RegWrite::new(0x10, data);
    }

    #[test]
    #[should_panic(expected = "register payload must be 1 or 2 bytes")]
    fn empty_payload_is_rejected() {
        let _ = RegWrite::new(0x10, &[]);
    }
}
