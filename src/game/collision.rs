//! Collision System
//!
//! AABB collision between the player and the active platform/collectible
//! sets. The player rectangle is moved into world space (screen x + camera)
//! before testing, and corrections are written back in screen space.
//!
//! Each overlapping platform is resolved on its own, in iteration order,
//! with the first matching rule winning:
//! 1. landing (falling, top above the platform top)
//! 2. ceiling (rising, bottom below the platform bottom)
//! 3. side hit moving right
//! 4. side hit moving left
//!
//! A platform resolved later can undo an earlier correction in the same
//! frame. That approximation is kept as-is.

use super::entity::{Collectible, Platform, Player, Rect};

/// Horizontal band around the viewport that collision considers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadPhase {
    pub min_x: f32,
    pub max_x: f32,
}

impl BroadPhase {
    pub fn around_camera(camera_x: f32, viewport_width: f32, margin: f32) -> Self {
        Self {
            min_x: camera_x - margin,
            max_x: camera_x + viewport_width + margin,
        }
    }

    #[inline]
    pub fn accepts(&self, rect: &Rect) -> bool {
        rect.within_x(self.min_x, self.max_x)
    }
}

/// Which rule resolved a platform overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Landed,
    Ceiling,
    WallLeftOfPlayer,
    WallRightOfPlayer,
}

/// Result of resolving the player against platforms
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformContacts {
    /// Did any platform catch the player from above?
    pub landed: bool,
    /// Did we bump a platform from below?
    pub hit_ceiling: bool,
    /// Did we run into the side of a platform?
    pub hit_wall: bool,
    /// Overlaps that matched no rule (e.g. standing still inside a block)
    pub unresolved: usize,
}

/// A collectible picked up this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    /// Points awarded, also recorded on the collectible as `reward`
    pub points: u64,
}

/// Resolve one overlapping platform; `None` when no rule applies
fn resolve_one(player: &mut Player, camera_x: f32, platform: &Rect) -> Option<Contact> {
    let world_x = player.x + camera_x;

    if player.vy > 0.0 && player.y < platform.y {
        player.y = platform.y - player.height;
        player.vy = 0.0;
        player.on_ground = true;
        player.jumps_used = 0;
        Some(Contact::Landed)
    } else if player.vy < 0.0 && player.bottom() > platform.bottom() {
        player.y = platform.bottom();
        player.vy = 0.0;
        Some(Contact::Ceiling)
    } else if player.vx > 0.0 && world_x < platform.x {
        player.x = platform.x - player.width - camera_x;
        player.vx = 0.0;
        Some(Contact::WallRightOfPlayer)
    } else if player.vx < 0.0 && world_x + player.width > platform.right() {
        player.x = platform.right() - camera_x;
        player.vx = 0.0;
        Some(Contact::WallLeftOfPlayer)
    } else {
        None
    }
}

/// Resolve the player against every platform in the broad-phase band.
///
/// Clears `on_ground` first; only a landing sets it again.
pub fn resolve_platforms(
    player: &mut Player,
    camera_x: f32,
    broad: BroadPhase,
    platforms: &[Platform],
) -> PlatformContacts {
    let mut contacts = PlatformContacts::default();
    player.on_ground = false;

    for platform in platforms {
        if !broad.accepts(&platform.rect) {
            continue;
        }
        if !player.world_rect(camera_x).overlaps(&platform.rect) {
            continue;
        }

        match resolve_one(player, camera_x, &platform.rect) {
            Some(Contact::Landed) => contacts.landed = true,
            Some(Contact::Ceiling) => contacts.hit_ceiling = true,
            Some(Contact::WallLeftOfPlayer) | Some(Contact::WallRightOfPlayer) => contacts.hit_wall = true,
            None => contacts.unresolved += 1,
        }
    }

    contacts
}

/// Mark overlapped collectibles as collected and report the points each is
/// worth (`floor(world_speed * multiplier)`). Already-collected items are
/// skipped, so a second overlap is a no-op.
pub fn collect_items(
    player: &Player,
    camera_x: f32,
    broad: BroadPhase,
    collectibles: &mut [Collectible],
    world_speed: f32,
    multiplier: f32,
) -> Vec<Pickup> {
    let player_rect = player.world_rect(camera_x);
    let mut pickups = Vec::new();

    for item in collectibles.iter_mut() {
        if item.collected || !broad.accepts(&item.rect) {
            continue;
        }
        if player_rect.overlaps(&item.rect) {
            let points = (world_speed * multiplier).floor().max(0.0) as u64;
            item.collected = true;
            item.reward = points;
            pickups.push(Pickup { points });
        }
    }

    pickups
}
