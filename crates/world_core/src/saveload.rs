//! World persistence. Entity records are written in master-list order —
//! order is part of the persisted contract, since reload must reproduce
//! identical simulation behavior — followed by the inactive side list when
//! requested. A failed load never leaves the registry partially populated.

use anyhow::{Context, Result, bail};
use glam::IVec2;
use save_core::{Group, SaveDecode, SaveEncode, take};

use crate::obj::{Obj, ObjId, ObjInit, Shape, Status};
use crate::registry::Registry;

/// Group entry holding the object records.
pub const OBJECTS_ENTRY: &str = "objects.bin";

const MAGIC: [u8; 4] = *b"WOB1";
const VERSION: u16 = 1;

const STATUS_ACTIVE: u8 = 0;
const STATUS_INACTIVE: u8 = 1;

/// One serialized entity: identity, category, placement, status. Property
/// slots are not persisted; definitions re-attach them on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjRecord {
    pub number: u32,
    pub category: u32,
    pub pos: [i32; 2],
    pub shape_off: [i32; 2],
    pub shape_size: [i32; 2],
    pub ocf: u32,
    pub status: u8,
}

impl ObjRecord {
    fn from_obj(o: &Obj) -> Self {
        Self {
            number: o.id.0,
            category: o.category,
            pos: [o.pos.x, o.pos.y],
            shape_off: [o.shape.off.x, o.shape.off.y],
            shape_size: [o.shape.size.x, o.shape.size.y],
            ocf: o.ocf,
            status: match o.status {
                Status::Active => STATUS_ACTIVE,
                Status::Inactive => STATUS_INACTIVE,
            },
        }
    }

    fn status(&self) -> Status {
        if self.status == STATUS_INACTIVE {
            Status::Inactive
        } else {
            Status::Active
        }
    }

    fn init(&self) -> ObjInit {
        ObjInit {
            category: self.category,
            pos: IVec2::new(self.pos[0], self.pos[1]),
            shape: Shape::new(
                IVec2::new(self.shape_off[0], self.shape_off[1]),
                IVec2::new(self.shape_size[0], self.shape_size[1]),
            ),
            ocf: self.ocf,
            status: self.status(),
        }
    }
}

impl SaveEncode for ObjRecord {
    fn encode(&self, out: &mut Vec<u8>) {
        self.number.encode(out);
        self.category.encode(out);
        for c in self.pos.iter().chain(&self.shape_off).chain(&self.shape_size) {
            c.encode(out);
        }
        self.ocf.encode(out);
        self.status.encode(out);
    }
}

impl SaveDecode for ObjRecord {
    fn decode(inp: &mut &[u8]) -> Result<Self> {
        let number = u32::decode(inp)?;
        let category = u32::decode(inp)?;
        let mut coords = [0i32; 6];
        for c in &mut coords {
            *c = i32::decode(inp)?;
        }
        let ocf = u32::decode(inp)?;
        let status = u8::decode(inp)?;
        if status > STATUS_INACTIVE {
            bail!("object record {number}: bad status byte {status}");
        }
        Ok(Self {
            number,
            category,
            pos: [coords[0], coords[1]],
            shape_off: [coords[2], coords[3]],
            shape_size: [coords[4], coords[5]],
            ocf,
            status,
        })
    }
}

fn encode_records(records: &[ObjRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&MAGIC);
    VERSION.encode(&mut out);
    let count = u32::try_from(records.len()).expect("record count fits u32");
    count.encode(&mut out);
    for r in records {
        r.encode(&mut out);
    }
    out
}

fn decode_records(mut inp: &[u8]) -> Result<Vec<ObjRecord>> {
    let magic = take::<4>(&mut inp).context("object file header")?;
    if magic != MAGIC {
        bail!("not an object file (bad magic)");
    }
    let version = u16::decode(&mut inp)?;
    if version != VERSION {
        bail!("unsupported object file version {version}");
    }
    let count = u32::decode(&mut inp)? as usize;
    let mut records = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        records.push(ObjRecord::decode(&mut inp)?);
    }
    if !inp.is_empty() {
        bail!("{} trailing bytes after object records", inp.len());
    }
    Ok(records)
}

impl Registry {
    /// Serialize entities in current master-list order, then (optionally)
    /// the inactive side list. With `save_game` unset, records are
    /// renumbered sequentially from 1 — a scenario export carries no live
    /// identity. Returns how many records were written.
    pub fn save(
        &self,
        group: &mut dyn Group,
        save_game: bool,
        save_inactive: bool,
    ) -> Result<usize> {
        let mut records: Vec<ObjRecord> = self
            .master()
            .iter()
            .filter_map(|id| self.get(id).map(ObjRecord::from_obj))
            .collect();
        if save_inactive {
            records.extend(
                self.inactive()
                    .iter()
                    .filter_map(|id| self.get(id).map(ObjRecord::from_obj)),
            );
        }
        if !save_game {
            for (i, r) in records.iter_mut().enumerate() {
                r.number = i as u32 + 1;
            }
        }
        let buf = encode_records(&records);
        group
            .write_entry(OBJECTS_ENTRY, &buf)
            .context("write object records")?;
        log::info!("saved {} object records", records.len());
        Ok(records.len())
    }

    /// Rebuild the registry from an archive, reconstructing master-list
    /// order and sector buckets, then repair category grouping. All-or-
    /// nothing: every record is decoded and validated before any live state
    /// is touched. Inactive records are dropped unless `keep_inactive`.
    pub fn load(&mut self, group: &dyn Group, keep_inactive: bool) -> Result<usize> {
        let buf = group.read_entry(OBJECTS_ENTRY).context("read object records")?;
        let records = decode_records(&buf)?;
        let mut seen = std::collections::HashSet::with_capacity(records.len());
        for r in &records {
            if r.number == 0 {
                bail!("object record with reserved number 0");
            }
            if !seen.insert(r.number) {
                bail!("duplicate object number {}", r.number);
            }
        }

        self.clear(true);
        let mut count = 0usize;
        for r in &records {
            if r.status() == Status::Inactive && !keep_inactive {
                continue;
            }
            // Append in stored order; fix_order below restores grouping
            // without disturbing consistent runs.
            self.add_appended(ObjId(r.number), r.init())
                .context("insert loaded object")?;
            count += 1;
        }
        self.fix_order();
        log::info!("loaded {count} of {} object records", records.len());
        Ok(count)
    }
}
