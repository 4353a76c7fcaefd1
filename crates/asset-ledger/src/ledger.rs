//! Existence-checked asset operations over a [`StateStore`].
//!
//! [`AssetLedger`] holds no state of its own: every call reads and writes the
//! injected store directly, so two ledgers over the same store observe each
//! other's writes immediately.
//!
//! Mutating operations are plain read-then-write sequences. Isolation between
//! concurrent writers is the store's responsibility; the ledger adds no
//! locking and performs no retries.

use custody_storage::{StateCursor, StateStore};
use tracing::{debug, warn};

use crate::{
    asset::Asset,
    error::{LedgerError, LedgerResult, Operation},
    seed::seed_assets,
};

/// Custody ledger over an ordered state store.
///
/// # Example
///
/// ```
/// use custody_ledger::{Asset, AssetLedger};
/// use custody_storage::MemoryStore;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let ledger = AssetLedger::new(MemoryStore::new());
/// ledger.seed().await.unwrap();
///
/// let previous = ledger.transfer_asset("Aya", "Faris", "PDRM").await.unwrap();
/// assert_eq!(previous, "Aya");
/// assert_eq!(ledger.read_asset("Aya").await.unwrap().custodian_agency, "PDRM");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct AssetLedger<S> {
    store: S,
}

impl<S: StateStore> AssetLedger<S> {
    /// Creates a ledger over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the ledger, returning the store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Writes the fixed initial records, overwriting any existing records
    /// with the same names.
    ///
    /// # Errors
    ///
    /// Stops at the first failing write and returns it. Records written
    /// before the failure stay written.
    #[tracing::instrument(skip(self))]
    pub async fn seed(&self) -> LedgerResult<()> {
        let assets = seed_assets();
        for asset in &assets {
            if let Err(err) = self.write(Operation::Seed, asset.key(), asset).await {
                warn!(key = asset.key(), error = %err, "seeding aborted");
                return Err(err);
            }
        }
        debug!(count = assets.len(), "ledger seeded");
        Ok(())
    }

    /// Stores a new record under its custodian name.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidKey`] if the custodian name is empty
    /// - [`LedgerError::AlreadyExists`] if a record is already stored under the name; nothing is
    ///   written
    /// - [`LedgerError::Encoding`] or [`LedgerError::Store`] on lower-level failure
    #[tracing::instrument(skip(self, asset), fields(key = %asset.custodian_name))]
    pub async fn create_asset(&self, asset: Asset) -> LedgerResult<()> {
        let op = Operation::Create;
        if asset.key().is_empty() {
            return Err(LedgerError::InvalidKey { operation: op });
        }
        if self.contains(op, asset.key()).await? {
            return Err(LedgerError::already_exists(op, asset.key()));
        }
        self.write(op, asset.key(), &asset).await?;
        debug!("asset created");
        Ok(())
    }

    /// Returns the record stored under `custodian_name`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record is stored under the name
    /// - [`LedgerError::Decoding`] if the stored bytes are not a valid record
    /// - [`LedgerError::Store`] on store failure
    #[tracing::instrument(skip(self))]
    pub async fn read_asset(&self, custodian_name: &str) -> LedgerResult<Asset> {
        self.load(Operation::Read, custodian_name).await
    }

    /// Replaces every field of an existing record.
    ///
    /// The custodian name selects the record and cannot itself be changed
    /// here; use [`transfer_asset`](Self::transfer_asset) for that.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record is stored under the name; nothing is written
    /// - [`LedgerError::Encoding`] or [`LedgerError::Store`] on lower-level failure
    #[tracing::instrument(skip(self, asset), fields(key = %asset.custodian_name))]
    pub async fn update_asset(&self, asset: Asset) -> LedgerResult<()> {
        let op = Operation::Update;
        if !self.contains(op, asset.key()).await? {
            return Err(LedgerError::not_found(op, asset.key()));
        }
        self.write(op, asset.key(), &asset).await?;
        debug!("asset updated");
        Ok(())
    }

    /// Removes the record stored under `custodian_name`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if no record is stored under the name
    /// - [`LedgerError::Store`] on store failure
    #[tracing::instrument(skip(self))]
    pub async fn delete_asset(&self, custodian_name: &str) -> LedgerResult<()> {
        let op = Operation::Delete;
        if !self.contains(op, custodian_name).await? {
            return Err(LedgerError::not_found(op, custodian_name));
        }
        self.store
            .delete(custodian_name)
            .await
            .map_err(|source| LedgerError::store(op, custodian_name, source))?;
        debug!("asset deleted");
        Ok(())
    }

    /// Returns whether a record is stored under `custodian_name`.
    ///
    /// Presence is judged by the key alone; the stored bytes are not decoded.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] on store failure.
    #[tracing::instrument(skip(self))]
    pub async fn asset_exists(&self, custodian_name: &str) -> LedgerResult<bool> {
        self.contains(Operation::Exists, custodian_name).await
    }

    /// Hands custody to a new custodian and agency.
    ///
    /// The record is looked up by using `case_number` as the store key and is
    /// written back under that same key, so the stored record's new custodian
    /// name may differ from the key it lives under. Case number and evidence
    /// are preserved.
    ///
    /// Returns the custodian name the record held before the transfer.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if nothing is stored under `case_number`
    /// - [`LedgerError::Decoding`], [`LedgerError::Encoding`] or [`LedgerError::Store`] on
    ///   lower-level failure
    #[tracing::instrument(skip(self, new_custodian_name, new_custodian_agency))]
    pub async fn transfer_asset(
        &self,
        case_number: &str,
        new_custodian_name: impl Into<String>,
        new_custodian_agency: impl Into<String>,
    ) -> LedgerResult<String> {
        let op = Operation::Transfer;
        let mut asset = self.load(op, case_number).await?;
        let previous = std::mem::replace(&mut asset.custodian_name, new_custodian_name.into());
        asset.custodian_agency = new_custodian_agency.into();

        self.write(op, case_number, &asset).await?;
        debug!(previous = %previous, custodian = %asset.custodian_name, "custody transferred");
        Ok(previous)
    }

    /// Returns every record in the store, in key order.
    ///
    /// The scan cursor is closed before returning on every path.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Decoding`] if any stored value is not a valid record; no partial list is
    ///   returned
    /// - [`LedgerError::Store`] if opening, advancing or closing the cursor fails
    #[tracing::instrument(skip(self))]
    pub async fn all_assets(&self) -> LedgerResult<Vec<Asset>> {
        let op = Operation::ScanAll;
        let mut cursor =
            self.store.scan("", "").await.map_err(|source| LedgerError::store_scan(op, source))?;

        let drained = collect_assets(cursor.as_mut()).await;
        let closed = cursor.close().await;

        match (drained, closed) {
            (Ok(assets), Ok(())) => {
                debug!(count = assets.len(), "assets listed");
                Ok(assets)
            },
            (Ok(_), Err(source)) => Err(LedgerError::store_scan(op, source)),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "failed to close cursor after aborted scan");
                Err(err)
            },
        }
    }

    async fn contains(&self, op: Operation, key: &str) -> LedgerResult<bool> {
        let value =
            self.store.get(key).await.map_err(|source| LedgerError::store(op, key, source))?;
        Ok(value.is_some())
    }

    async fn load(&self, op: Operation, key: &str) -> LedgerResult<Asset> {
        let bytes = self
            .store
            .get(key)
            .await
            .map_err(|source| LedgerError::store(op, key, source))?
            .ok_or_else(|| LedgerError::not_found(op, key))?;
        Asset::from_bytes(&bytes).map_err(|source| LedgerError::Decoding {
            operation: op,
            key: key.to_owned(),
            source,
        })
    }

    async fn write(&self, op: Operation, key: &str, asset: &Asset) -> LedgerResult<()> {
        let bytes = asset.to_bytes().map_err(|source| LedgerError::Encoding {
            operation: op,
            key: key.to_owned(),
            source,
        })?;
        self.store.put(key, bytes).await.map_err(|source| LedgerError::store(op, key, source))
    }
}

/// Decodes every remaining cursor entry, stopping at the first failure.
///
/// Advances only while the cursor reports more entries. A `None` from `next`
/// also ends the scan.
async fn collect_assets(cursor: &mut dyn StateCursor) -> LedgerResult<Vec<Asset>> {
    let op = Operation::ScanAll;
    let mut assets = Vec::new();
    while cursor.has_next() {
        let step = cursor.next().await.map_err(|source| LedgerError::store_scan(op, source))?;
        let Some(entry) = step else {
            break;
        };
        let asset = Asset::from_bytes(&entry.value).map_err(|source| LedgerError::Decoding {
            operation: op,
            key: entry.key.clone(),
            source,
        })?;
        assets.push(asset);
    }
    Ok(assets)
}
