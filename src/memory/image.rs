//! Frozen process memory image
//!
//! This module provides the byte-level view of a paused process:
//! - Mapped regions at fixed or allocator-chosen addresses
//! - Per-byte initialization tracking
//! - Released regions kept as tombstones, so stale pointers fault instead of
//!   reading unrelated data
//!
//! Reads never span two regions. A read that starts in one region and runs past
//! its end is a fault, the same as a read from an unmapped address.

use super::value::Address;
use crate::constants::IMAGE_ADDRESS_START;
use crate::errors::{PrintError, Result};
use std::collections::BTreeMap;

/// State of a mapped region
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionState {
    Mapped,
    Released, // Freed before the snapshot; any read is a stale reference
}

/// A contiguous range of target memory
#[derive(Debug, Clone)]
pub struct Region {
    pub data: Vec<u8>, // Raw bytes
    pub size: usize,
    pub state: RegionState,
    pub init_map: Vec<bool>, // Per-byte initialization tracking
}

impl Region {
    pub fn new(size: usize) -> Self {
        Region {
            data: vec![0; size],
            size,
            state: RegionState::Mapped,
            init_map: vec![false; size],
        }
    }

    /// Region whose bytes all read as zero
    pub fn zeroed(size: usize) -> Self {
        Region {
            init_map: vec![true; size],
            ..Region::new(size)
        }
    }

    /// Check if a byte range is initialized
    pub fn is_initialized(&self, offset: usize, size: usize) -> bool {
        if offset + size > self.size {
            return false;
        }
        self.init_map[offset..offset + size].iter().all(|&b| b)
    }

    /// Read bytes from the region
    pub fn read_bytes(&self, offset: usize, size: usize) -> Option<&[u8]> {
        if offset + size <= self.size {
            Some(&self.data[offset..offset + size])
        } else {
            None
        }
    }

    /// Write bytes to the region, marking them initialized
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> bool {
        if offset + bytes.len() > self.size {
            return false;
        }
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        for flag in &mut self.init_map[offset..offset + bytes.len()] {
            *flag = true;
        }
        true
    }
}

/// The memory image
#[derive(Debug, Clone)]
pub struct MemoryImage {
    regions: BTreeMap<Address, Region>,
    next_address: Address,
    mapped_bytes: usize,
}

impl MemoryImage {
    pub fn new() -> Self {
        MemoryImage {
            regions: BTreeMap::new(),
            next_address: IMAGE_ADDRESS_START,
            mapped_bytes: 0,
        }
    }

    /// Allocate an uninitialized region at the next free aligned address
    pub fn allocate(&mut self, size: usize, align: usize) -> Address {
        self.allocate_region(Region::new(size), align)
    }

    /// Allocate a region whose bytes read as zero
    pub fn allocate_zeroed(&mut self, size: usize, align: usize) -> Address {
        self.allocate_region(Region::zeroed(size), align)
    }

    fn allocate_region(&mut self, region: Region, align: usize) -> Address {
        let align = align.max(1) as u64;
        let addr = self.next_address.div_ceil(align) * align;
        // Zero-sized regions still consume an address so that they stay distinct
        self.next_address = addr + region.size.max(1) as u64;
        self.mapped_bytes += region.size;
        self.regions.insert(addr, region);
        addr
    }

    /// Map a region at a caller-chosen address
    pub fn map_region(&mut self, address: Address, size: usize) -> Result<()> {
        let end = address
            .checked_add(size.max(1) as u64)
            .ok_or(PrintError::InvalidAddress { address })?;
        let overlaps = self
            .regions
            .range(..end)
            .next_back()
            .is_some_and(|(&start, region)| start + region.size.max(1) as u64 > address);
        if overlaps {
            return Err(PrintError::RegionOverlap { address });
        }
        self.regions.insert(address, Region::new(size));
        self.mapped_bytes += size;
        self.next_address = self.next_address.max(end);
        Ok(())
    }

    /// Release a region (kept as a tombstone)
    pub fn release(&mut self, address: Address) -> Result<()> {
        match self.regions.get_mut(&address) {
            Some(region) if region.state == RegionState::Mapped => {
                region.state = RegionState::Released;
                Ok(())
            }
            Some(_) => Err(PrintError::StaleReference { address }),
            None => Err(PrintError::InvalidAddress { address }),
        }
    }

    /// All regions, including tombstones
    pub fn regions(&self) -> impl Iterator<Item = (Address, &Region)> {
        self.regions.iter().map(|(&addr, region)| (addr, region))
    }

    /// Total bytes ever mapped
    pub fn mapped_bytes(&self) -> usize {
        self.mapped_bytes
    }

    /// Find the region containing an address
    fn locate(&self, address: Address) -> Result<(Address, &Region)> {
        let (&start, region) = self
            .regions
            .range(..=address)
            .next_back()
            .filter(|(start, region)| address < **start + region.size as u64)
            .ok_or(PrintError::InvalidAddress { address })?;
        if region.state == RegionState::Released {
            return Err(PrintError::StaleReference { address });
        }
        Ok((start, region))
    }

    /// Write bytes starting at an address
    pub fn write_bytes_at(&mut self, address: Address, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        let (start, _) = self.locate(address)?;
        let offset = (address - start) as usize;
        let region = self
            .regions
            .get_mut(&start)
            .ok_or(PrintError::InvalidAddress { address })?;
        if region.write_bytes(offset, bytes) {
            Ok(())
        } else {
            Err(PrintError::ReadOverrun {
                address,
                len: bytes.len(),
            })
        }
    }

    /// Read bytes starting at an address
    pub fn read_bytes_at(&self, address: Address, len: usize) -> Result<Vec<u8>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        let (start, region) = self.locate(address)?;
        let offset = (address - start) as usize;
        let bytes = region
            .read_bytes(offset, len)
            .ok_or(PrintError::ReadOverrun { address, len })?;

        if !region.is_initialized(offset, len) {
            let first = region.init_map[offset..offset + len]
                .iter()
                .position(|&b| !b)
                .unwrap_or(0);
            return Err(PrintError::UninitializedRead {
                address: address + first as u64,
            });
        }

        Ok(bytes.to_vec())
    }
}

impl Default for MemoryImage {
    fn default() -> Self {
        Self::new()
    }
}
