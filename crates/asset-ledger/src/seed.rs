//! Initial custody records written by [`AssetLedger::seed`](crate::AssetLedger::seed).

use crate::asset::Asset;

/// Fixed records installed at ledger initialization, in write order.
const SEED_ASSETS: [(&str, &str, &str, &str); 6] = [
    ("Zaki", "RCED", "1", "HP01/HP02"),
    ("Aya", "RBPF", "2", "HP01/HP02/HP03"),
    ("Adi", "KDN", "3", "HP01/HP02/SIM01/SIM02"),
    ("Dan", "CSB", "4", "HP01/HP02/SIM01/"),
    ("Azmi", "RCED", "5", "HP01/HP02/HP03/SIM01/SIM02"),
    ("Mirul", "CSB", "6", "HP01/HP02/HP03/SIM01/SIM02/SIM03"),
];

/// Returns the seed records in the order they are written.
#[must_use]
pub fn seed_assets() -> Vec<Asset> {
    SEED_ASSETS
        .iter()
        .map(|&(name, agency, case, evidence)| Asset::new(name, agency, case, evidence))
        .collect()
}
