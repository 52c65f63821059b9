// webgl.rs - WebGL2 point renderer
//
// One program, one VAO, two buffers (xyz, rgb). Colors upload once per
// pipeline; positions re-upload whenever the cloud's version moves.
// All GL objects live in `Pipeline` so a lost context can be rebuilt
// wholesale.

use js_sys::Float32Array;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlContextAttributes,
    WebGlPowerPreference, WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::{Backend, drawing_buffer_size, point_scale};
use crate::config::{PowerPreference, RendererOptions};
use crate::error::RenderError;
use crate::scene::{PerspectiveCamera, Scene};

const POSITION_LOCATION: u32 = 0;
const COLOR_LOCATION: u32 = 1;

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;

uniform mat4 u_model_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_scale;
uniform float u_attenuate;
uniform float u_vertex_colors;

out vec3 v_color;
out float v_depth;

void main() {
    vec4 mv = u_model_view * vec4(a_position, 1.0);
    gl_Position = u_projection * mv;
    gl_PointSize = u_attenuate > 0.5 ? u_size * (u_scale / -mv.z) : u_size;
    v_color = mix(vec3(1.0), a_color, u_vertex_colors);
    v_depth = -mv.z;
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

uniform float u_opacity;
uniform vec3 u_fog_color;
uniform float u_fog_density;

in vec3 v_color;
in float v_depth;
out vec4 out_color;

void main() {
    float d = u_fog_density * v_depth;
    float fog = clamp(1.0 - exp(-d * d), 0.0, 1.0);
    out_color = vec4(mix(v_color, u_fog_color, fog), u_opacity);
}
"#;

struct Uniforms {
    model_view: WebGlUniformLocation,
    projection: WebGlUniformLocation,
    size: WebGlUniformLocation,
    scale: WebGlUniformLocation,
    attenuate: WebGlUniformLocation,
    vertex_colors: WebGlUniformLocation,
    opacity: WebGlUniformLocation,
    fog_color: WebGlUniformLocation,
    fog_density: WebGlUniformLocation,
}

struct Pipeline {
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    positions: WebGlBuffer,
    colors: WebGlBuffer,
    uniforms: Uniforms,
    uploaded_points: usize,
    uploaded_version: Option<u64>,
}

impl Pipeline {
    fn build(gl: &GL) -> Result<Self, RenderError> {
        let program = link_program(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;

        let uniform = |name: &'static str| {
            gl.get_uniform_location(&program, name).ok_or(RenderError::Resource(name))
        };
        let uniforms = Uniforms {
            model_view: uniform("u_model_view")?,
            projection: uniform("u_projection")?,
            size: uniform("u_size")?,
            scale: uniform("u_scale")?,
            attenuate: uniform("u_attenuate")?,
            vertex_colors: uniform("u_vertex_colors")?,
            opacity: uniform("u_opacity")?,
            fog_color: uniform("u_fog_color")?,
            fog_density: uniform("u_fog_density")?,
        };

        let vao = gl.create_vertex_array().ok_or(RenderError::Resource("vertex array"))?;
        let positions = gl.create_buffer().ok_or(RenderError::Resource("position buffer"))?;
        let colors = gl.create_buffer().ok_or(RenderError::Resource("color buffer"))?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&positions));
        gl.vertex_attrib_pointer_with_i32(POSITION_LOCATION, 3, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&colors));
        gl.vertex_attrib_pointer_with_i32(COLOR_LOCATION, 3, GL::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(COLOR_LOCATION);
        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);

        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE_MINUS_SRC_ALPHA);
        gl.enable(GL::DEPTH_TEST);
        gl.depth_func(GL::LEQUAL);

        Ok(Self {
            program,
            vao,
            positions,
            colors,
            uniforms,
            uploaded_points: 0,
            uploaded_version: None,
        })
    }

    fn delete(self, gl: &GL) {
        gl.delete_buffer(Some(&self.positions));
        gl.delete_buffer(Some(&self.colors));
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_program(Some(&self.program));
    }

    /// Bring GPU buffers up to date with the cloud.
    fn sync(&mut self, gl: &GL, scene: &Scene) {
        let cloud = &scene.points;
        let version = cloud.positions_version();
        if self.uploaded_points != cloud.len() {
            upload(gl, &self.colors, cloud.field().color_floats(), GL::STATIC_DRAW);
            upload(gl, &self.positions, cloud.field().position_floats(), GL::DYNAMIC_DRAW);
            self.uploaded_points = cloud.len();
        } else if self.uploaded_version != Some(version) {
            gl.bind_buffer(GL::ARRAY_BUFFER, Some(&self.positions));
            // SAFETY: the view is consumed before anything can grow wasm memory
            unsafe {
                let view = Float32Array::view(cloud.field().position_floats());
                gl.buffer_sub_data_with_i32_and_array_buffer_view(GL::ARRAY_BUFFER, 0, &view);
            }
        }
        self.uploaded_version = Some(version);
    }
}

pub struct WebGlBackend {
    canvas: HtmlCanvasElement,
    gl: GL,
    pipeline: Option<Pipeline>,
    css_w: u32,
    css_h: u32,
    ratio: f64,
}

impl WebGlBackend {
    /// Create a WebGL2 context on `canvas` and compile the point pipeline.
    pub fn acquire(canvas: &HtmlCanvasElement, options: &RendererOptions) -> Result<Self, RenderError> {
        let attrs = WebGlContextAttributes::new();
        attrs.set_alpha(options.alpha);
        attrs.set_antialias(options.antialias);
        attrs.set_fail_if_major_performance_caveat(options.fail_if_major_performance_caveat);
        attrs.set_power_preference(match options.power_preference {
            PowerPreference::Default => WebGlPowerPreference::Default,
            PowerPreference::LowPower => WebGlPowerPreference::LowPower,
            PowerPreference::HighPerformance => WebGlPowerPreference::HighPerformance,
        });

        let gl = canvas
            .get_context_with_context_options("webgl2", &attrs)
            .map_err(|e| RenderError::Unavailable(js_message(&e)))?
            .ok_or_else(|| RenderError::Unavailable("webgl2 context refused".into()))?
            .dyn_into::<GL>()
            .map_err(|_| RenderError::Unavailable("unexpected context type".into()))?;

        let pipeline = Pipeline::build(&gl)?;
        log::debug!("webgl2 pipeline ready");

        Ok(Self {
            canvas: canvas.clone(),
            css_w: canvas.width(),
            css_h: canvas.height(),
            gl,
            pipeline: Some(pipeline),
            ratio: 1.0,
        })
    }

    fn apply_size(&self) {
        let (w, h) = drawing_buffer_size(self.css_w, self.css_h, self.ratio);
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", self.css_w));
        let _ = style.set_property("height", &format!("{}px", self.css_h));
        self.gl.viewport(0, 0, w as i32, h as i32);
    }
}

impl Backend for WebGlBackend {
    fn set_size(&mut self, width: u32, height: u32) {
        self.css_w = width;
        self.css_h = height;
        self.apply_size();
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
        self.apply_size();
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.gl.is_context_lost() {
            return Err(RenderError::ContextLost);
        }
        let gl = &self.gl;
        let pipeline = self.pipeline.as_mut().ok_or(RenderError::ContextLost)?;
        pipeline.sync(gl, scene);

        match scene.background {
            Some(c) => gl.clear_color(c.r, c.g, c.b, 1.0),
            None => gl.clear_color(0.0, 0.0, 0.0, 0.0),
        }
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);

        let cloud = &scene.points;
        let material = &cloud.material;
        let model_view = camera.view() * cloud.model_matrix();
        let (_, buffer_h) = drawing_buffer_size(self.css_w, self.css_h, self.ratio);
        let u = &pipeline.uniforms;

        gl.use_program(Some(&pipeline.program));
        gl.uniform_matrix4fv_with_f32_array(Some(&u.model_view), false, &model_view.to_cols_array());
        gl.uniform_matrix4fv_with_f32_array(
            Some(&u.projection),
            false,
            &camera.projection().to_cols_array(),
        );
        if material.size_attenuation {
            gl.uniform1f(Some(&u.size), material.size);
            gl.uniform1f(Some(&u.attenuate), 1.0);
        } else {
            gl.uniform1f(Some(&u.size), material.size * self.ratio as f32);
            gl.uniform1f(Some(&u.attenuate), 0.0);
        }
        gl.uniform1f(Some(&u.scale), point_scale(buffer_h));
        gl.uniform1f(Some(&u.vertex_colors), if material.vertex_colors { 1.0 } else { 0.0 });
        gl.uniform1f(Some(&u.opacity), if material.transparent { material.opacity } else { 1.0 });
        match scene.fog {
            Some(fog) => {
                gl.uniform3f(Some(&u.fog_color), fog.color.r, fog.color.g, fog.color.b);
                gl.uniform1f(Some(&u.fog_density), fog.density);
            }
            None => gl.uniform1f(Some(&u.fog_density), 0.0),
        }
        gl.depth_mask(!material.transparent);

        gl.bind_vertex_array(Some(&pipeline.vao));
        gl.draw_arrays(GL::POINTS, 0, cloud.len() as i32);
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        // Objects from the lost context are already invalid; just drop them.
        self.pipeline = None;
        self.pipeline = Some(Pipeline::build(&self.gl)?);
        self.apply_size();
        Ok(())
    }

    fn release(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            if !self.gl.is_context_lost() {
                pipeline.delete(&self.gl);
            }
        }
    }
}

fn upload(gl: &GL, buffer: &WebGlBuffer, data: &[f32], usage: u32) {
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(buffer));
    // SAFETY: the view is consumed before anything can grow wasm memory
    unsafe {
        let view = Float32Array::view(data);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &view, usage);
    }
}

fn link_program(gl: &GL, vertex_src: &str, fragment_src: &str) -> Result<WebGlProgram, RenderError> {
    let vertex = compile_shader(gl, GL::VERTEX_SHADER, vertex_src)?;
    let fragment = compile_shader(gl, GL::FRAGMENT_SHADER, fragment_src)?;
    let program = gl.create_program().ok_or(RenderError::Resource("program"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    gl.detach_shader(&program, &vertex);
    gl.detach_shader(&program, &fragment);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    if linked {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown program error".to_string());
        gl.delete_program(Some(&program));
        Err(RenderError::Program(info))
    }
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, RenderError> {
    let shader = gl.create_shader(kind).ok_or(RenderError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".to_string());
        gl.delete_shader(Some(&shader));
        Err(RenderError::Shader(info))
    }
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
