//! Address command

use clap::Args;
use tabi_abi::{get_address, get_icap_address};
use tabi_primitives::Address;

use crate::{output::Output, CliError};

/// Show the checksummed, ICAP and Tron forms of an address
#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Hex (any case) or ICAP address
    pub address: String,
}

impl AddressArgs {
    pub fn execute(self, json: bool) -> Result<(), CliError> {
        let checksummed = get_address(&self.address)?;
        let icap = get_icap_address(&checksummed)?;
        let tron = Address::from_hex(&checksummed)?.to_tron_hex();

        Output::new(json)
            .field("address", &checksummed)
            .field("icap", &icap)
            .field("tron", &tron)
            .message(&format!(
                "Address: {}\nICAP:    {}\nTron:    {}",
                checksummed, icap, tron
            ))
            .print();
        Ok(())
    }
}
