use std::path::PathBuf;

use crate::discovery::DiscoveryError;

const STEAM_SUBKEY: &str = "Software\\Valve\\Steam\0";
const INSTALL_PATH_VALUE: &str = "SteamPath\0";

pub(crate) fn steam_path() -> Result<PathBuf, DiscoveryError> {
    use windows_sys::Win32::System::Registry::{
        HKEY_CURRENT_USER, KEY_READ, REG_SZ, RegCloseKey, RegOpenKeyExW, RegQueryValueExW,
    };

    let subkey: Vec<u16> = STEAM_SUBKEY.encode_utf16().collect();
    let value_name: Vec<u16> = INSTALL_PATH_VALUE.encode_utf16().collect();

    unsafe {
        let mut hkey = std::mem::zeroed();
        let status = RegOpenKeyExW(HKEY_CURRENT_USER, subkey.as_ptr(), 0, KEY_READ, &mut hkey);
        if status != 0 {
            return Err(DiscoveryError::ClientNotFound(format!(
                "registry key HKCU\\Software\\Valve\\Steam is not readable (status {status})"
            )));
        }

        let mut value_type = 0u32;
        let mut byte_len = 0u32;
        let status = RegQueryValueExW(
            hkey,
            value_name.as_ptr(),
            std::ptr::null_mut(),
            &mut value_type,
            std::ptr::null_mut(),
            &mut byte_len,
        );
        if status != 0 {
            RegCloseKey(hkey);
            return Err(DiscoveryError::ClientNotFound(format!(
                "registry value SteamPath is missing (status {status})"
            )));
        }

        let mut buffer = vec![0u16; (byte_len as usize).div_ceil(2)];
        let status = RegQueryValueExW(
            hkey,
            value_name.as_ptr(),
            std::ptr::null_mut(),
            &mut value_type,
            buffer.as_mut_ptr().cast::<u8>(),
            &mut byte_len,
        );
        RegCloseKey(hkey);

        if status != 0 || value_type != REG_SZ {
            return Err(DiscoveryError::ClientNotFound(format!(
                "registry value SteamPath is not a readable string (status {status}, type {value_type})"
            )));
        }

        while buffer.last() == Some(&0) {
            buffer.pop();
        }
        if buffer.is_empty() {
            return Err(DiscoveryError::ClientNotFound(
                "registry value SteamPath is empty".to_string(),
            ));
        }

        Ok(PathBuf::from(String::from_utf16_lossy(&buffer)))
    }
}
