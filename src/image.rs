use crate::ffi::MachHeader64;

#[cfg(any(target_os = "macos", target_os = "ios"))]
extern "C" {
    static _mh_execute_header: MachHeader64;
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn execute_header() -> Option<&'static MachHeader64> {
    // SAFETY: defined by ld64 for every executable, mapped for the whole
    // process lifetime and never written after load.
    Some(unsafe { &*std::ptr::addr_of!(_mh_execute_header) })
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub fn execute_header() -> Option<&'static MachHeader64> {
    None
}
