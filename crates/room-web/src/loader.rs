//! Asynchronous GLB loading: fetch bytes, parse with `gltf`, build a
//! detached scene subtree. Loads are fire-and-forget; each completion
//! installs its root into the viewer, failures are logged and leave the
//! target inert.

use anyhow::{anyhow, bail, Result};
use glam::{Quat, Vec3};
use room_core::scene::{Aabb, MeshData, MeshVertex, Node, NodeId, Scene, Transform};
use room_core::viewer::Viewer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?;
    let resp: web::Response = resp_value
        .dyn_into()
        .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?;
    if !resp.ok() {
        bail!("fetch {}: HTTP {}", url, resp.status());
    }
    let buf = JsFuture::from(
        resp.array_buffer()
            .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?,
    )
    .await
    .map_err(|e| anyhow!("fetch {}: {:?}", url, e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Parse a GLB byte buffer into a detached subtree; the caller decides
/// whether and when to attach it.
pub fn build_subtree(scene: &mut Scene, bytes: &[u8], label: &str) -> Result<NodeId> {
    let (doc, buffers, _images) = gltf::import_slice(bytes)?;
    let gscene = doc
        .default_scene()
        .or_else(|| doc.scenes().next())
        .ok_or_else(|| anyhow!("{}: gltf document has no scene", label))?;
    let root = scene.add_node(Node::named(label));
    for gnode in gscene.nodes() {
        build_node(scene, &buffers, gnode, root)?;
    }
    Ok(root)
}

fn build_node(
    scene: &mut Scene,
    buffers: &[gltf::buffer::Data],
    gnode: gltf::Node,
    parent: NodeId,
) -> Result<()> {
    let name = gnode.name().unwrap_or("node").to_string();
    let (t, r, s) = gnode.transform().decomposed();
    let mut node = Node::named(name.clone());
    node.local = Transform {
        translation: Vec3::from(t),
        rotation: Quat::from_array(r),
        scale: Vec3::from(s),
    };
    let id = scene.add_child(parent, node);
    if let Some(mesh) = gnode.mesh() {
        for (pi, prim) in mesh.primitives().enumerate() {
            let data = read_primitive(&prim, buffers)?;
            let mesh_id = scene.add_mesh(data);
            if pi == 0 {
                if let Some(n) = scene.node_mut(id) {
                    n.mesh = Some(mesh_id);
                }
            } else {
                // extra primitives hang off as synthesized children
                scene.add_child(id, Node::with_mesh(format!("{}_prim{}", name, pi), mesh_id));
            }
        }
    }
    for child in gnode.children() {
        build_node(scene, buffers, child, id)?;
    }
    Ok(())
}

fn read_primitive(prim: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Result<MeshData> {
    let reader = prim.reader(|b| buffers.get(b.index()).map(|d| d.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or_else(|| anyhow!("primitive has no positions"))?
        .collect();
    let normals: Vec<[f32; 3]> = match reader.read_normals() {
        Some(it) => it.collect(),
        None => vec![[0.0, 1.0, 0.0]; positions.len()],
    };
    let indices: Vec<u32> = match reader.read_indices() {
        Some(ix) => ix.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let local_aabb = Aabb::from_points(positions.iter().map(|p| Vec3::from(*p)))
        .ok_or_else(|| anyhow!("primitive has no extent"))?;
    let vertices = positions
        .iter()
        .zip(normals.iter())
        .map(|(p, n)| MeshVertex {
            position: *p,
            normal: *n,
        })
        .collect();
    let base_color = prim.material().pbr_metallic_roughness().base_color_factor();
    Ok(MeshData {
        vertices,
        indices,
        base_color,
        local_aabb,
    })
}

async fn load_model(
    viewer: &Rc<RefCell<Viewer>>,
    url: &str,
    label: &str,
) -> Result<NodeId> {
    let bytes = fetch_bytes(url).await?;
    let mut v = viewer.borrow_mut();
    build_subtree(&mut v.scene, &bytes, label)
}

/// Fire-and-forget load; `install` runs on success with the detached root.
pub fn spawn_load(
    viewer: Rc<RefCell<Viewer>>,
    url: &'static str,
    label: &'static str,
    install: impl FnOnce(&mut Viewer, NodeId) + 'static,
) {
    spawn_local(async move {
        match load_model(&viewer, url, label).await {
            Ok(root) => {
                install(&mut viewer.borrow_mut(), root);
                log::info!("[load] {} ready", label);
            }
            Err(e) => log::error!("[load] {} failed: {:?}", label, e),
        }
    });
}
