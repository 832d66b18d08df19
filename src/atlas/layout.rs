//! Atlas layout: assigns every canonical texture a page and position.

use super::registry::{Placement, Registry};
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::packer::Packer;

/// Final size of one atlas page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub width: u32,
    pub height: u32,
}

/// Result of a layout pass, indexed like the registry.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub pages: Vec<PageInfo>,
    pub placements: Vec<Placement>,
}

struct OpenPage {
    packer: Packer,
    height: u32,
}

/// Pack all canonical textures, largest first, onto as many pages as needed.
///
/// Nothing is written back on failure. Packers are dropped on return.
pub(crate) fn lay_out(registry: &Registry, config: &AtlasConfig) -> Result<Layout> {
    let page_width = config.page_width();
    let border = config.border_width;

    // Tallest first, then widest. Ties keep registration order.
    let sizes: Vec<(u32, u32)> = registry
        .iter()
        .map(|texture| (texture.width(), texture.height()))
        .collect();
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by(|&a, &b| {
        let ((wa, ha), (wb, hb)) = (sizes[a], sizes[b]);
        hb.cmp(&ha).then_with(|| wb.cmp(&wa))
    });

    let mut pages: Vec<OpenPage> = Vec::new();
    let mut placements: Vec<Option<Placement>> = vec![None; sizes.len()];

    for index in order {
        let (width, height) = sizes[index];
        let footprint_width = width + 2 * border;
        let footprint_height = height + 2 * border;

        if footprint_width > page_width || footprint_height > page_width {
            return Err(AtlasError::FootprintTooLarge {
                width,
                height,
                border,
                page_width,
            });
        }

        let mut placed = None;
        for (page_index, page) in pages.iter_mut().enumerate() {
            if let Some(position) = page.packer.find_space(footprint_width, footprint_height) {
                placed = Some((page_index, position));
                break;
            }
        }

        let (page_index, (x, y)) = match placed {
            Some(found) => found,
            None => {
                let mut packer = Packer::new(page_width);
                let position = packer
                    .find_space(footprint_width, footprint_height)
                    .ok_or(AtlasError::FootprintTooLarge {
                        width,
                        height,
                        border,
                        page_width,
                    })?;
                pages.push(OpenPage { packer, height: 0 });
                log::trace!("Opened atlas page {}", pages.len() - 1);
                (pages.len() - 1, position)
            }
        };

        let page = &mut pages[page_index];
        page.height = page.height.max(y + footprint_height);

        placements[index] = Some(Placement {
            page: page_index,
            x_with_border: x,
            y_with_border: y,
        });
        log::trace!(
            "Placed canonical texture {} ({}x{}) on page {} at ({}, {})",
            index,
            width,
            height,
            page_index,
            x,
            y
        );
    }

    let pages: Vec<PageInfo> = pages
        .into_iter()
        .map(|page| {
            let height = if config.supports_non_power_of_two {
                page.height
            } else {
                page.height.next_power_of_two()
            };
            PageInfo {
                width: page_width,
                height,
            }
        })
        .collect();

    log::debug!(
        "Laid out {} canonical textures on {} pages of width {}",
        registry.len(),
        pages.len(),
        page_width
    );

    Ok(Layout {
        pages,
        placements: placements.into_iter().flatten().collect(),
    })
}
