// ============================================================
// Layer 3 — Breed Table
// ============================================================
// The Imagewoof dataset stores each class in a directory named
// after its WordNet id (e.g. `n02086240`). Labels are assigned
// by sorting those directory names, so the table below is kept
// in wnid order: entry `i` is both label `i` and its display name.
//
//   label  wnid        breed
//   0      n02086240   Shih-Tzu
//   1      n02087394   Rhodesian ridgeback
//   ...
//   9      n02115641   Dingo
//
// Reference: Rust Book §8 (Slices)

/// Number of classes the classifier predicts.
pub const NUM_CLASSES: usize = 10;

/// (wordnet id, human-readable breed name), sorted by wordnet id.
pub const BREEDS: [(&str, &str); NUM_CLASSES] = [
    ("n02086240", "Shih-Tzu"),
    ("n02087394", "Rhodesian ridgeback"),
    ("n02088364", "Beagle"),
    ("n02089973", "English foxhound"),
    ("n02093754", "Border terrier"),
    ("n02096294", "Australian terrier"),
    ("n02099601", "Golden retriever"),
    ("n02105641", "Old English sheepdog"),
    ("n02111889", "Samoyed"),
    ("n02115641", "Dingo"),
];

/// Directory names expected under `train/` and `val/`, in label order.
pub fn class_dirs() -> Vec<&'static str> {
    BREEDS.iter().map(|(wnid, _)| *wnid).collect()
}

/// Human-readable breed name for a label index.
pub fn breed_name(label: usize) -> Option<&'static str> {
    BREEDS.get(label).map(|(_, name)| *name)
}
