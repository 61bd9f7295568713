//! Static mapping between module names and their numeric ids.

use std::collections::HashMap;

use crate::levels::ModuleId;

/// Name/id pairs for every module the bot tracks.
const MODULES: &[(&str, ModuleId)] = &[
    ("rs", 701),
    ("shipmentrelay", 702),
    ("corplevel", 801),
    ("transp", 103),
    ("miner", 102),
    ("bs", 101),
    ("cargobay", 401),
    ("computer", 402),
    ("tradeboost", 403),
    ("rush", 404),
    ("tradeburst", 405),
    ("shipdrone", 406),
    ("offload", 407),
    ("beam", 408),
    ("entrust", 409),
    ("recall", 410),
    ("dispatch", 411),
    ("relicdrone", 412),
    ("miningboost", 501),
    ("hydrobay", 502),
    ("enrich", 503),
    ("remote", 504),
    ("hydroupload", 505),
    ("miningunity", 506),
    ("crunch", 507),
    ("genesis", 508),
    ("minedrone", 509),
    ("hydrorocket", 510),
    ("battery", 202),
    ("laser", 203),
    ("mass", 204),
    ("dual", 205),
    ("barrage", 206),
    ("dart", 207),
    ("alpha", 301),
    ("delta", 302),
    ("passive", 303),
    ("omega", 304),
    ("mirror", 305),
    ("blast", 306),
    ("area", 307),
    ("emp", 601),
    ("teleport", 602),
    ("rsextender", 603),
    ("repair", 604),
    ("warp", 605),
    ("unity", 606),
    ("sanctuary", 607),
    ("stealth", 608),
    ("fortify", 609),
    ("impulse", 610),
    ("rocket", 611),
    ("salvage", 612),
    ("suppress", 613),
    ("destiny", 614),
    ("barrier", 615),
    ("vengeance", 616),
    ("deltarocket", 617),
    ("leap", 618),
    ("bond", 619),
    ("alphadrone", 620),
    ("omegarocket", 621),
    ("suspend", 622),
    ("remotebomb", 623),
    ("laserturret", 624),
];

/// Immutable bidirectional name/id table for progression modules.
///
/// Built once at startup and shared by reference. Pure data: unknown inputs
/// yield `None`, never an error, and the table is never mutated after
/// construction.
#[derive(Debug)]
pub struct ModuleCatalog {
    by_name: HashMap<&'static str, ModuleId>,
    by_id: HashMap<ModuleId, &'static str>,
}

impl ModuleCatalog {
    /// Builds the catalog, including the inverse map.
    pub fn new() -> Self {
        let by_name = MODULES.iter().copied().collect();
        let by_id = MODULES.iter().map(|&(name, id)| (id, name)).collect();
        Self { by_name, by_id }
    }

    /// Looks up the numeric id for a module name.
    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    /// Looks up the module name for a numeric id.
    pub fn name_of(&self, id: ModuleId) -> Option<&'static str> {
        self.by_id.get(&id).copied()
    }

    /// Whether `id` belongs to the catalog's id space.
    pub fn contains(&self, id: ModuleId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// All known name/id pairs, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, ModuleId)> + '_ {
        MODULES.iter().copied()
    }

    pub fn len(&self) -> usize {
        MODULES.len()
    }

    pub fn is_empty(&self) -> bool {
        MODULES.is_empty()
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::new()
    }
}
