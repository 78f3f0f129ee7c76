//! Descriptors exposed by the emulated-machine host.
//!
//! Every descriptor is a versioned enum. A new layout is added as a new variant,
//! and the `enum_dispatch`ed accessor traits make the compiler point at every
//! place that has to learn about it.

use bitflags::bitflags;
use enum_dispatch::enum_dispatch;

use std::any::Any;
use std::rc::Rc;

/// Debugger interface version this crate negotiates with hosts.
pub const DEBUGGER_INTERFACE_VERSION: u32 = 1;

/// Name of the extension a host config exposes to accept a debugger.
pub const SET_DEBUGGER_EXTENSION: &str = "hc_set_debugger";

/// Opaque per-core state handed back by the host when a debugger attaches.
/// All accessors receive it untouched.
pub type Context = Rc<dyn Any>;

pub type RegisterGetter = Rc<dyn Fn(&Context) -> u64>;
pub type RegisterSetter = Rc<dyn Fn(&Context, u64)>;
pub type MemoryPeek = Rc<dyn Fn(&Context, u64) -> u8>;
pub type StepInto = Rc<dyn Fn(&Context)>;

bitflags! {
    pub struct RegisterFlags: u32 {
        const PROGRAM_COUNTER = 1 << 0;
        const STACK_POINTER = 1 << 1;
        const MEMORY_POINTER = 1 << 2;
    }
}

bitflags! {
    pub struct MemoryFlags: u32 {
        const CPU_ADDRESSABLE = 1 << 0;
    }
}

//
// registers
//

#[enum_dispatch]
pub trait RegisterInfo {
    fn name(&self) -> &str;
    /// Width in bytes.
    fn size(&self) -> u8;
    fn flags(&self) -> RegisterFlags;
    /// Bit names from the most significant bit down.
    fn bits(&self) -> Option<&[String]>;
    fn is_readonly(&self) -> bool;

    fn read(&self, ctx: &Context) -> u64;
    fn write(&self, ctx: &Context, value: u64);
}

#[derive(Clone)]
pub struct RegisterV1 {
    pub name: String,
    pub size: u8,
    pub flags: RegisterFlags,
    pub bits: Option<Rc<[String]>>,
    pub get: RegisterGetter,
    /// `None` marks the register read-only.
    pub set: Option<RegisterSetter>,
}

impl RegisterInfo for RegisterV1 {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u8 {
        self.size
    }

    fn flags(&self) -> RegisterFlags {
        self.flags
    }

    fn bits(&self) -> Option<&[String]> {
        self.bits.as_deref()
    }

    fn is_readonly(&self) -> bool {
        self.set.is_none()
    }

    fn read(&self, ctx: &Context) -> u64 {
        (self.get)(ctx)
    }

    fn write(&self, ctx: &Context, value: u64) {
        if let Some(ref set) = self.set {
            set(ctx, value);
        }
    }
}

#[enum_dispatch(RegisterInfo)]
#[derive(Clone)]
pub enum HostRegister {
    V1(RegisterV1),
}

//
// memory regions
//

#[enum_dispatch]
pub trait MemoryInfo {
    fn description(&self) -> &str;
    fn size(&self) -> u64;
    fn flags(&self) -> MemoryFlags;

    fn peek(&self, ctx: &Context, address: u64) -> u8;
}

#[derive(Clone)]
pub struct MemoryV1 {
    pub description: String,
    pub size: u64,
    pub flags: MemoryFlags,
    pub peek: MemoryPeek,
}

impl MemoryInfo for MemoryV1 {
    fn description(&self) -> &str {
        &self.description
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn flags(&self) -> MemoryFlags {
        self.flags
    }

    fn peek(&self, ctx: &Context, address: u64) -> u8 {
        (self.peek)(ctx, address)
    }
}

#[enum_dispatch(MemoryInfo)]
#[derive(Clone)]
pub enum HostMemory {
    V1(MemoryV1),
}

//
// cpus
//

#[enum_dispatch]
pub trait CpuInfo {
    fn description(&self) -> &str;
    fn registers(&self) -> &[HostRegister];
    fn memory_regions(&self) -> &[HostMemory];

    fn can_step_into(&self) -> bool;
    fn step_into(&self, ctx: &Context);
}

#[derive(Clone)]
pub struct CpuV1 {
    pub description: String,
    pub registers: Vec<HostRegister>,
    pub memory_regions: Vec<HostMemory>,
    pub step_into: Option<StepInto>,
}

impl CpuInfo for CpuV1 {
    fn description(&self) -> &str {
        &self.description
    }

    fn registers(&self) -> &[HostRegister] {
        &self.registers
    }

    fn memory_regions(&self) -> &[HostMemory] {
        &self.memory_regions
    }

    fn can_step_into(&self) -> bool {
        self.step_into.is_some()
    }

    fn step_into(&self, ctx: &Context) {
        if let Some(ref step) = self.step_into {
            step(ctx);
        }
    }
}

#[enum_dispatch(CpuInfo)]
#[derive(Clone)]
pub enum HostCpu {
    V1(CpuV1),
}

//
// system
//

#[enum_dispatch]
pub trait SystemInfo {
    fn description(&self) -> &str;
    fn cpus(&self) -> &[HostCpu];
    fn memory_regions(&self) -> &[HostMemory];
}

#[derive(Clone)]
pub struct SystemV1 {
    pub description: String,
    pub cpus: Vec<HostCpu>,
    pub memory_regions: Vec<HostMemory>,
}

impl SystemInfo for SystemV1 {
    fn description(&self) -> &str {
        &self.description
    }

    fn cpus(&self) -> &[HostCpu] {
        &self.cpus
    }

    fn memory_regions(&self) -> &[HostMemory] {
        &self.memory_regions
    }
}

#[enum_dispatch(SystemInfo)]
#[derive(Clone)]
pub enum HostSystem {
    V1(SystemV1),
}

//
// capability negotiation
//

/// What a host hands back when it accepts a debugger.
#[derive(Clone)]
pub struct Attachment {
    pub system: HostSystem,
    pub context: Context,
}

pub trait DebuggerHost {
    /// Returns `None` when the host can't serve the requested interface version.
    fn set_debugger(&self, version: u32) -> Option<Attachment>;
}

#[derive(Clone)]
pub enum Extension {
    SetDebugger(Rc<dyn DebuggerHost>),
}

/// Extension lookup offered by the host configuration.
pub trait Config {
    fn extension(&self, name: &str) -> Option<Extension>;
}
