//! splasher-sim - a pin-level 25-series flash chip simulator
//!
//! [`SimFlash`] implements [`PinFacility`], so the whole engine runs
//! against it unchanged: the transport wiggles the simulated lines and the
//! simulator decodes opcodes, addresses and data from the edges it sees,
//! exactly as a real chip would. Nothing in here shortcuts past the wire
//! protocol, which makes it useful both as a test double and as a `sim`
//! programmer target for dry runs.

use splasher_core::pins::{Direction, PinAssignment, PinFacility, PinId};
use splasher_core::protocol::opcodes;

/// One decoded bus-level command, recorded in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    WriteEnable,
    ReadJedecId,
    ReadStatus,
    Read { addr: u32 },
    PageProgram { addr: u32, len: u32 },
    SectorErase { addr: u32 },
    BlockErase32 { addr: u32 },
    BlockErase64 { addr: u32 },
    ChipErase,
}

/// What the chip is currently shifting out.
#[derive(Debug, Clone, Copy)]
enum Response {
    None,
    Identity { index: usize },
    Status,
    Memory { addr: u32 },
}

/// Where the chip is in decoding the current frame.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Opcode,
    Address { opcode: u8, bytes: [u8; 3], got: u8 },
    ProgramData { addr: u32 },
    Responding,
}

/// In-memory flash chip driven entirely through its pins.
///
/// Erases set bits, programming only clears them, and every program or
/// erase needs a preceding write-enable while the hardware write-protect
/// line is released. After a program or erase the status register reads
/// busy for `busy_latency` polls before settling.
pub struct SimFlash {
    map: PinAssignment,
    memory: Vec<u8>,
    identity: [u8; 3],

    // Driven line levels
    sck: bool,
    mosi: bool,
    cs: bool,
    wp: bool,

    // Input shift register
    in_shift: u8,
    in_bits: u8,

    // Output shift register
    out_shift: u8,
    out_bits: u8,

    phase: Phase,
    response: Response,
    program_buf: Vec<u8>,

    write_enabled: bool,
    busy_polls: u32,
    busy_latency: u32,

    ops: Vec<BusOp>,
    pin_ops: u64,
}

impl SimFlash {
    /// A blank (all-0xFF) chip of `size` bytes with the default pinout and
    /// a generic 16 MiB identity.
    pub fn new(size: usize) -> Self {
        Self {
            map: PinAssignment::default(),
            memory: vec![0xFF; size],
            identity: [0xEF, 0x40, 0x18],
            sck: false,
            mosi: false,
            cs: true,
            wp: false,
            in_shift: 0,
            in_bits: 0,
            out_shift: 0,
            out_bits: 0,
            phase: Phase::Opcode,
            response: Response::None,
            program_buf: Vec::new(),
            write_enabled: false,
            busy_polls: 0,
            busy_latency: 2,
            ops: Vec::new(),
            pin_ops: 0,
        }
    }

    pub fn with_assignment(mut self, map: PinAssignment) -> Self {
        self.map = map;
        self
    }

    pub fn with_identity(mut self, identity: [u8; 3]) -> Self {
        self.identity = identity;
        self
    }

    /// How many status polls report busy after each program or erase.
    pub fn with_busy_latency(mut self, polls: u32) -> Self {
        self.busy_latency = polls;
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.memory
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    /// Every decoded command, in arrival order.
    pub fn ops(&self) -> &[BusOp] {
        &self.ops
    }

    /// Total pin operations (direction changes, writes, reads) seen.
    pub fn pin_ops(&self) -> u64 {
        self.pin_ops
    }

    fn protected(&self) -> bool {
        self.wp
    }

    fn begin_frame(&mut self) {
        self.phase = Phase::Opcode;
        self.response = Response::None;
        self.in_shift = 0;
        self.in_bits = 0;
        self.out_bits = 0;
        self.program_buf.clear();
    }

    /// Chip-select released: commit a pending page program.
    fn end_frame(&mut self) {
        if let Phase::ProgramData { addr } = self.phase {
            let len = self.program_buf.len() as u32;
            self.ops.push(BusOp::PageProgram { addr, len });
            if self.write_enabled {
                for (i, &byte) in self.program_buf.iter().enumerate() {
                    let index = (addr as usize + i) % self.memory.len();
                    self.memory[index] &= byte;
                }
            }
            self.write_enabled = false;
            self.busy_polls = self.busy_latency;
        }
        self.phase = Phase::Opcode;
    }

    fn erase_region(&mut self, addr: u32, size: u32) {
        if !self.write_enabled {
            return;
        }
        let start = (addr - addr % size) as usize;
        for i in start..start + size as usize {
            let index = i % self.memory.len();
            self.memory[index] = 0xFF;
        }
    }

    fn finish_modify(&mut self) {
        self.write_enabled = false;
        self.busy_polls = self.busy_latency;
    }

    fn on_opcode(&mut self, opcode: u8) {
        match opcode {
            opcodes::WREN => {
                self.ops.push(BusOp::WriteEnable);
                if !self.protected() {
                    self.write_enabled = true;
                }
                self.phase = Phase::Opcode;
            }
            opcodes::RDID => {
                self.ops.push(BusOp::ReadJedecId);
                self.response = Response::Identity { index: 0 };
                self.phase = Phase::Responding;
            }
            opcodes::RDSR => {
                self.ops.push(BusOp::ReadStatus);
                self.response = Response::Status;
                self.phase = Phase::Responding;
            }
            opcodes::READ | opcodes::PP | opcodes::SE_20 | opcodes::BE_52 | opcodes::BE_D8 => {
                self.phase = Phase::Address {
                    opcode,
                    bytes: [0; 3],
                    got: 0,
                };
            }
            opcodes::CE_C7 => {
                self.ops.push(BusOp::ChipErase);
                if self.write_enabled {
                    self.memory.fill(0xFF);
                }
                self.finish_modify();
                self.phase = Phase::Opcode;
            }
            other => {
                log::warn!("sim: ignoring unknown opcode {other:#04x}");
                self.phase = Phase::Opcode;
            }
        }
    }

    fn on_address_complete(&mut self, opcode: u8, addr: u32) {
        match opcode {
            opcodes::READ => {
                self.ops.push(BusOp::Read { addr });
                self.response = Response::Memory { addr };
                self.phase = Phase::Responding;
            }
            opcodes::PP => {
                self.phase = Phase::ProgramData { addr };
            }
            opcodes::SE_20 => {
                self.ops.push(BusOp::SectorErase { addr });
                self.erase_region(addr, 4 * 1024);
                self.finish_modify();
                self.phase = Phase::Opcode;
            }
            opcodes::BE_52 => {
                self.ops.push(BusOp::BlockErase32 { addr });
                self.erase_region(addr, 32 * 1024);
                self.finish_modify();
                self.phase = Phase::Opcode;
            }
            opcodes::BE_D8 => {
                self.ops.push(BusOp::BlockErase64 { addr });
                self.erase_region(addr, 64 * 1024);
                self.finish_modify();
                self.phase = Phase::Opcode;
            }
            _ => unreachable!("address phase only entered for addressed opcodes"),
        }
    }

    fn on_input_byte(&mut self, byte: u8) {
        match self.phase {
            Phase::Opcode => self.on_opcode(byte),
            Phase::Address {
                opcode,
                mut bytes,
                got,
            } => {
                bytes[got as usize] = byte;
                if got == 2 {
                    let addr =
                        (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32;
                    self.on_address_complete(opcode, addr);
                } else {
                    self.phase = Phase::Address {
                        opcode,
                        bytes,
                        got: got + 1,
                    };
                }
            }
            Phase::ProgramData { .. } => self.program_buf.push(byte),
            // Dummy bits clocked while the chip is answering
            Phase::Responding => {}
        }
    }

    /// Load the next byte of the current response into the output shifter.
    fn load_response_byte(&mut self) {
        self.out_shift = match self.response {
            Response::None => 0xFF,
            Response::Identity { ref mut index } => {
                let byte = self.identity.get(*index).copied().unwrap_or(0);
                *index += 1;
                byte
            }
            Response::Status => {
                if self.busy_polls > 0 {
                    self.busy_polls -= 1;
                    opcodes::SR1_WIP
                } else if self.write_enabled {
                    0x02
                } else {
                    0x00
                }
            }
            Response::Memory { ref mut addr } => {
                let byte = self.memory[*addr as usize % self.memory.len()];
                *addr = addr.wrapping_add(1);
                byte
            }
        };
        self.out_bits = 8;
    }

    fn on_sck_rising(&mut self) {
        if self.cs {
            return;
        }
        self.in_shift = (self.in_shift << 1) | self.mosi as u8;
        self.in_bits += 1;
        if self.in_bits == 8 {
            let byte = self.in_shift;
            self.in_shift = 0;
            self.in_bits = 0;
            self.on_input_byte(byte);
        }
        if self.out_bits > 0 {
            self.out_shift <<= 1;
            self.out_bits -= 1;
        }
    }
}

impl PinFacility for SimFlash {
    fn set_direction(&mut self, _pin: PinId, _direction: Direction) {
        self.pin_ops += 1;
    }

    fn write(&mut self, pin: PinId, high: bool) {
        self.pin_ops += 1;
        if pin == self.map.sck {
            let rising = high && !self.sck;
            self.sck = high;
            if rising {
                self.on_sck_rising();
            }
        } else if pin == self.map.mosi {
            self.mosi = high;
        } else if pin == self.map.cs {
            let was = self.cs;
            self.cs = high;
            if was && !high {
                self.begin_frame();
            } else if !was && high {
                self.end_frame();
            }
        } else if pin == self.map.wp {
            self.wp = high;
        }
    }

    fn read(&mut self, pin: PinId) -> bool {
        self.pin_ops += 1;
        if pin != self.map.miso {
            return false;
        }
        if self.out_bits == 0 {
            self.load_response_byte();
        }
        self.out_shift & 0x80 != 0
    }

    fn delay_us(&mut self, _us: u32) {}
}
