use super::{BufferId, ImageData, TextureId};

/// One deferred write.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Initial content of a static buffer.
    UploadStaticBuffer {
        buffer: BufferId,
        offset: u64,
        data: Vec<u8>,
    },
    /// Per-frame content of a dynamic buffer.
    UpdateDynamicBuffer {
        buffer: BufferId,
        offset: u64,
        data: Vec<u8>,
    },
    /// Full-image upload into mip level 0.
    UploadTexture { texture: TextureId, image: ImageData },
}

/// Deferred set of buffer and texture writes submitted together with a frame.
///
/// A batch does nothing on its own. It is handed to a render pass and the
/// backend applies its operations, in order, before that frame's commands run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceUpdateBatch {
    ops: Vec<UpdateOp>,
}

impl ResourceUpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_static_buffer(&mut self, buffer: BufferId, offset: u64, data: &[u8]) {
        self.ops.push(UpdateOp::UploadStaticBuffer {
            buffer,
            offset,
            data: data.to_vec(),
        });
    }

    pub fn update_dynamic_buffer(&mut self, buffer: BufferId, offset: u64, data: &[u8]) {
        self.ops.push(UpdateOp::UpdateDynamicBuffer {
            buffer,
            offset,
            data: data.to_vec(),
        });
    }

    pub fn upload_texture(&mut self, texture: TextureId, image: ImageData) {
        self.ops.push(UpdateOp::UploadTexture { texture, image });
    }

    /// Moves every operation of `other` to the end of this batch.
    ///
    /// Taking `other` by value is what releases it: a merged batch cannot be
    /// submitted a second time.
    pub fn merge(&mut self, other: ResourceUpdateBatch) {
        self.ops.extend(other.ops);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[UpdateOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<UpdateOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelSize;

    #[test]
    fn merge_appends_in_order() {
        let mut frame = ResourceUpdateBatch::new();
        frame.update_dynamic_buffer(BufferId::from_raw(1), 0, &[1, 2, 3, 4]);

        let mut initial = ResourceUpdateBatch::new();
        initial.upload_static_buffer(BufferId::from_raw(2), 0, &[9; 8]);
        initial.upload_texture(
            TextureId::from_raw(3),
            ImageData::solid(PixelSize::new(1, 1), [0, 0, 0, 255]),
        );

        frame.merge(initial);
        assert_eq!(frame.len(), 3);
        assert!(matches!(frame.ops()[0], UpdateOp::UpdateDynamicBuffer { .. }));
        assert!(matches!(frame.ops()[1], UpdateOp::UploadStaticBuffer { .. }));
        assert!(matches!(frame.ops()[2], UpdateOp::UploadTexture { .. }));
    }

    #[test]
    fn merging_an_empty_batch_is_a_no_op() {
        let mut batch = ResourceUpdateBatch::new();
        batch.merge(ResourceUpdateBatch::new());
        assert!(batch.is_empty());
    }
}
