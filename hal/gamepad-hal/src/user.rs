//! Caller-supplied buffers
//!
//! Reads copy data out to memory the driver does not own. The kernel's
//! user-pointer type implements [`UserBuffer`] and reports inaccessible
//! memory as a [`CopyFault`].

/// The destination buffer could not take the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CopyFault;

/// Destination for data leaving the driver
pub trait UserBuffer {
    /// Copy all of `src` to the start of the buffer
    ///
    /// Either every byte is copied or none are reported as transferred.
    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), CopyFault>;
}

impl UserBuffer for [u8] {
    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        let dst = self.get_mut(..src.len()).ok_or(CopyFault)?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl<const N: usize> UserBuffer for [u8; N] {
    fn copy_to_user(&mut self, src: &[u8]) -> Result<(), CopyFault> {
        self.as_mut_slice().copy_to_user(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_fits() {
        let mut buf = [0u8; 6];
        assert!(buf.copy_to_user(&[1, 2, 3, 4]).is_ok());
        assert_eq!(buf, [1, 2, 3, 4, 0, 0]);
    }

    #[test]
    fn test_copy_too_short() {
        let mut buf = [0xEEu8; 3];
        assert_eq!(buf.copy_to_user(&[1, 2, 3, 4]), Err(CopyFault));
        // Nothing is written on failure
        assert_eq!(buf, [0xEE; 3]);
    }

    #[test]
    fn test_copy_empty_buffer() {
        let buf: &mut [u8] = &mut [];
        assert_eq!(buf.copy_to_user(&[0]), Err(CopyFault));
    }
}
