/// Bind groups shared by every draw call in the frame.
pub struct DrawBindGroups<'a> {
    /// Camera uniform bind group (group 0).
    pub camera: &'a wgpu::BindGroup,
    /// Lighting uniform bind group (group 1 of the surface pipeline).
    pub lighting: &'a wgpu::BindGroup,
}
