//! Runtime binding to the vendor library via `libloading`.
//!
//! Entry points are named `{prefix}_{Operation}` (e.g. `SBC_MoveToPosition`
//! for benchtop stepper controllers). Each one is resolved on first use and
//! cached. Libraries are loaded at most once per process and never unloaded.

#![allow(unsafe_code)]

use std::collections::HashMap;
use std::ffi::{c_char, c_int, c_long, c_short, CString};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use libloading::Library;

use crate::error::{ConfigError, Error, Result};

use super::{HardwareInfoBuffers, MotionControlLibrary};

type Registry = Mutex<HashMap<(PathBuf, String), &'static KinesisLibrary>>;

static LIBRARIES: OnceLock<Registry> = OnceLock::new();

/// Address of a resolved entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint(usize);

/// Call a resolved entry point with the signature from the vendor header.
macro_rules! vendor_call {
    ($lib:expr, $op:literal, fn($($ty:ty),*) -> $ret:ty, $($arg:expr),*) => {{
        let entry = $lib.resolve($op)?;
        // SAFETY: the address came from the loaded library, which is never
        // unloaded, and the signature matches the vendor header.
        let f = unsafe {
            std::mem::transmute::<usize, unsafe extern "C" fn($($ty),*) -> $ret>(entry.0)
        };
        unsafe { f($($arg),*) }
    }};
}

/// Vendor motion-control library loaded from disk.
pub struct KinesisLibrary {
    path: PathBuf,
    prefix: String,
    library: Option<Library>,
    symbols: Mutex<HashMap<&'static str, EntryPoint>>,
}

impl std::fmt::Debug for KinesisLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KinesisLibrary")
            .field("path", &self.path)
            .field("prefix", &self.prefix)
            .field("loaded", &self.library.is_some())
            .finish()
    }
}

impl KinesisLibrary {
    /// Process-wide instance for `path` and `prefix`, loading it on first use.
    ///
    /// Loading failure is not an error here; it is reported by
    /// [`MotionControlLibrary::is_available`] and by every call.
    pub fn shared(path: impl AsRef<Path>, prefix: &str) -> &'static KinesisLibrary {
        let registry = LIBRARIES.get_or_init(|| Mutex::new(HashMap::new()));
        let mut libraries = registry.lock().unwrap_or_else(|e| e.into_inner());
        let key = (path.as_ref().to_path_buf(), prefix.to_owned());
        libraries
            .entry(key)
            .or_insert_with_key(|(path, prefix)| Box::leak(Box::new(Self::load(path, prefix))))
    }

    fn load(path: &Path, prefix: &str) -> Self {
        // SAFETY: loading runs the library's initializers; the vendor library
        // is a plain C API without loader-time requirements.
        let library = match unsafe { Library::new(path) } {
            Ok(library) => {
                info!("loaded motion control library {}", path.display());
                Some(library)
            }
            Err(e) => {
                warn!("motion control library {} unavailable: {}", path.display(), e);
                None
            }
        };

        Self {
            path: path.to_path_buf(),
            prefix: prefix.to_owned(),
            library,
            symbols: Mutex::new(HashMap::new()),
        }
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry point prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Look up `{prefix}_{operation}`, caching the result.
    ///
    /// # Errors
    ///
    /// `LibraryUnavailable` if the library did not load, `SymbolNotFound` if
    /// it lacks the entry point.
    pub fn resolve(&self, operation: &'static str) -> Result<EntryPoint> {
        let library = self.library.as_ref().ok_or(Error::LibraryUnavailable)?;
        let mut symbols = self.symbols.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(&entry) = symbols.get(operation) {
            return Ok(entry);
        }

        let name = format!("{}_{}", self.prefix, operation);
        // SAFETY: the symbol is only read as an address here.
        let symbol = unsafe { library.get::<unsafe extern "C" fn()>(name.as_bytes()) }
            .map_err(|_| {
                let mut short = heapless::String::<64>::new();
                for c in name.chars() {
                    if short.push(c).is_err() {
                        break;
                    }
                }
                Error::SymbolNotFound(short)
            })?;
        let entry = EntryPoint(*symbol as usize);
        symbols.insert(operation, entry);
        debug!("resolved {}", name);
        Ok(entry)
    }
}

fn c_serial(serial: &str) -> Result<CString> {
    CString::new(serial).map_err(|_| {
        Error::Config(ConfigError::InvalidSerialNumber(
            heapless::String::try_from(serial).unwrap_or_default(),
        ))
    })
}

fn c_channel(channel: u16) -> Result<c_short> {
    c_short::try_from(channel).map_err(|_| Error::Config(ConfigError::InvalidChannel(channel)))
}

impl MotionControlLibrary for KinesisLibrary {
    fn is_available(&self) -> bool {
        self.library.is_some()
    }

    fn open(&self, serial: &str) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(self, "Open", fn(*const c_char) -> c_short, s.as_ptr()))
    }

    fn close(&self, serial: &str) -> Result<()> {
        let s = c_serial(serial)?;
        vendor_call!(self, "Close", fn(*const c_char) -> (), s.as_ptr());
        Ok(())
    }

    fn channel_count(&self, serial: &str) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(self, "GetNumChannels", fn(*const c_char) -> c_short, s.as_ptr()))
    }

    fn request_settings(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "RequestSettings",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn request_status_bits(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "RequestStatusBits",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn request_position(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "RequestPosition",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn start_polling(&self, serial: &str, channel: u16, interval_ms: i32) -> Result<bool> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "StartPolling",
            fn(*const c_char, c_short, c_int) -> bool,
            s.as_ptr(),
            c_channel(channel)?,
            interval_ms
        ))
    }

    fn stop_polling(&self, serial: &str, channel: u16) -> Result<()> {
        let s = c_serial(serial)?;
        vendor_call!(
            self,
            "StopPolling",
            fn(*const c_char, c_short) -> (),
            s.as_ptr(),
            c_channel(channel)?
        );
        Ok(())
    }

    fn hardware_info(
        &self,
        serial: &str,
        channel: u16,
        out: &mut HardwareInfoBuffers,
    ) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "GetHardwareInfo",
            fn(
                *const c_char,
                c_short,
                *mut c_char,
                u32,
                *mut u16,
                *mut u16,
                *mut c_char,
                u32,
                *mut u32,
                *mut u16,
                *mut u16
            ) -> c_short,
            s.as_ptr(),
            c_channel(channel)?,
            out.model_number.as_mut_ptr().cast::<c_char>(),
            out.model_number.len() as u32,
            &mut out.hardware_type,
            &mut out.channel_count,
            out.notes.as_mut_ptr().cast::<c_char>(),
            out.notes.len() as u32,
            &mut out.firmware_version,
            &mut out.hardware_version,
            &mut out.modification_state
        ))
    }

    fn status_bits(&self, serial: &str, channel: u16) -> Result<u32> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "GetStatusBits",
            fn(*const c_char, c_short) -> u32,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn enable_channel(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "EnableChannel",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn disable_channel(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "DisableChannel",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn travel_mode(&self, serial: &str, channel: u16) -> Result<i32> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "GetMotorTravelMode",
            fn(*const c_char, c_short) -> c_int,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn set_travel_mode(&self, serial: &str, channel: u16, mode: i32) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "SetMotorTravelMode",
            fn(*const c_char, c_short, c_int) -> c_short,
            s.as_ptr(),
            c_channel(channel)?,
            mode
        ))
    }

    fn reset_rotation_modes(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "ResetRotationModes",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn set_rotation_modes(
        &self,
        serial: &str,
        channel: u16,
        mode: i32,
        direction: i32,
    ) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "SetRotationModes",
            fn(*const c_char, c_short, c_int, c_int) -> c_short,
            s.as_ptr(),
            c_channel(channel)?,
            mode,
            direction
        ))
    }

    fn position(&self, serial: &str, channel: u16) -> Result<i32> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "GetPosition",
            fn(*const c_char, c_short) -> c_int,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn position_counter(&self, serial: &str, channel: u16) -> Result<i64> {
        let s = c_serial(serial)?;
        let counter = vendor_call!(
            self,
            "GetPositionCounter",
            fn(*const c_char, c_short) -> c_long,
            s.as_ptr(),
            c_channel(channel)?
        );
        Ok(i64::from(counter))
    }

    fn move_to_position(&self, serial: &str, channel: u16, index: i32) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "MoveToPosition",
            fn(*const c_char, c_short, c_int) -> c_short,
            s.as_ptr(),
            c_channel(channel)?,
            index
        ))
    }

    fn can_home(&self, serial: &str, channel: u16) -> Result<bool> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "CanHome",
            fn(*const c_char, c_short) -> bool,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn home(&self, serial: &str, channel: u16) -> Result<i16> {
        let s = c_serial(serial)?;
        Ok(vendor_call!(
            self,
            "Home",
            fn(*const c_char, c_short) -> c_short,
            s.as_ptr(),
            c_channel(channel)?
        ))
    }

    fn real_value_from_device_unit(
        &self,
        serial: &str,
        channel: u16,
        device_units: i32,
        unit_type: i32,
    ) -> Result<(i16, f64)> {
        let s = c_serial(serial)?;
        let mut real = 0.0f64;
        let status = vendor_call!(
            self,
            "GetRealValueFromDeviceUnit",
            fn(*const c_char, c_short, c_int, *mut f64, c_int) -> c_short,
            s.as_ptr(),
            c_channel(channel)?,
            device_units,
            &mut real,
            unit_type
        );
        Ok((status, real))
    }

    fn device_unit_from_real_value(
        &self,
        serial: &str,
        channel: u16,
        real_value: f64,
        unit_type: i32,
    ) -> Result<(i16, i32)> {
        let s = c_serial(serial)?;
        let mut units: c_int = 0;
        let status = vendor_call!(
            self,
            "GetDeviceUnitFromRealValue",
            fn(*const c_char, c_short, f64, *mut c_int, c_int) -> c_short,
            s.as_ptr(),
            c_channel(channel)?,
            real_value,
            &mut units,
            unit_type
        );
        Ok((status, units))
    }
}
