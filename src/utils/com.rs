//! COM apartment guard
//!
//! Shell containers are apartment-bound COM objects. [`ComApartment::enter`]
//! joins a single-threaded apartment for the current thread and leaves it when
//! the guard is dropped. Off Windows the guard does nothing.

#[cfg(windows)]
#[expect(unsafe_code, reason = "Windows FFI for COM apartment initialization")]
mod imp {
    use crate::error::ShellError;
    use std::marker::PhantomData;
    use tracing::debug;
    use windows::Win32::Foundation::RPC_E_CHANGED_MODE;
    use windows::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx, CoUninitialize};

    /// Membership of the current thread in a COM apartment
    #[derive(Debug)]
    pub struct ComApartment {
        owns_init: bool,
        // CoUninitialize must run on the thread that initialized
        _not_send: PhantomData<*const ()>,
    }

    impl ComApartment {
        /// Enter a single-threaded apartment
        ///
        /// A thread already in a multithreaded apartment stays there; the guard then
        /// leaves the apartment alone on drop.
        pub fn enter() -> Result<Self, ShellError> {
            let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
            if hr == RPC_E_CHANGED_MODE {
                debug!("Thread already in a multithreaded apartment");
                return Ok(Self {
                    owns_init: false,
                    _not_send: PhantomData,
                });
            }
            if hr.is_err() {
                return Err(ShellError::new("CoInitializeEx", hr.0));
            }
            Ok(Self {
                owns_init: true,
                _not_send: PhantomData,
            })
        }
    }

    impl Drop for ComApartment {
        fn drop(&mut self) {
            if self.owns_init {
                unsafe { CoUninitialize() };
            }
        }
    }
}

#[cfg(not(windows))]
mod imp {
    use crate::error::ShellError;

    /// Membership of the current thread in a COM apartment (no-op off Windows)
    #[derive(Debug)]
    pub struct ComApartment;

    impl ComApartment {
        /// Enter a single-threaded apartment
        pub const fn enter() -> Result<Self, ShellError> {
            Ok(Self)
        }
    }
}

pub use imp::ComApartment;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_apartments() {
        let outer = ComApartment::enter().expect("enter apartment");
        let inner = ComApartment::enter().expect("re-enter apartment");
        drop(inner);
        drop(outer);
    }
}
