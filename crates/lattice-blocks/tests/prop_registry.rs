use lattice_blocks::config::{BlockEntry, BlocksConfig};
use lattice_blocks::registry::{BlockRegistry, BlockTable};
use lattice_blocks::types::Shape;
use proptest::collection::btree_set;
use proptest::prelude::*;

fn entry(name: &str, transparent: bool) -> BlockEntry {
    BlockEntry {
        name: name.into(),
        id: None,
        texture: None,
        shape: Some(Shape::Cube),
        transparent: Some(transparent),
    }
}

#[test]
fn explicit_texture_overrides_name() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "grass"
        texture = "grass_top"

        [[blocks]]
        name = "bush"
        shape = "model"
        transparent = true
    "#,
    )
    .unwrap();
    let grass = reg.lookup(0).unwrap();
    assert_eq!(grass.texture, "grass_top");
    let bush = reg.lookup(1).unwrap();
    assert_eq!(bush.shape, Shape::Model);
    assert!(!bush.is_cube());
    assert!(bush.transparent);
}

proptest! {
    // every configured name resolves to an id whose definition carries that name
    #[test]
    fn names_and_ids_agree(names in btree_set("[a-z]{1,8}", 1..32), flags in proptest::collection::vec(any::<bool>(), 32)) {
        let blocks: Vec<BlockEntry> = names
            .iter()
            .zip(flags.iter())
            .map(|(n, t)| entry(n, *t))
            .collect();
        let reg = BlockRegistry::from_config(BlocksConfig { blocks }).expect("registry");
        prop_assert_eq!(reg.len(), names.len());
        for (i, name) in names.iter().enumerate() {
            let id = reg.id_by_name(name).expect("id");
            prop_assert_eq!(id as usize, i);
            let def = reg.lookup(id).expect("def");
            prop_assert_eq!(&def.name, name);
            prop_assert_eq!(def.transparent, flags[i]);
        }
        prop_assert!(reg.lookup(names.len() as u16).is_none());
    }
}
