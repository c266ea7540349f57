//! Resolved programs shared by the unit tests.

use crate::model::EntryPointSet;
use shadergen_ir::ir::{AssignOp, BinaryOp, Intrinsic, UnaryOp};
use shadergen_ir::source::{
    FieldDecl, FunctionDecl, ParamDecl, ResolvedProgram, ResourceDecl, ShaderSetDecl, SourceExpr,
    SourceExprKind, SourceStmt, SourceSwitchCase, StructDecl, TypeRef,
};
use shadergen_ir::{AccessMode, ParamDirection, ResourceKind, ScalarKind, Semantic, Stage};

fn qualified(group: &str, name: &str) -> String {
    format!("TestShaders.{group}.{name}")
}

fn local(name: &str, ty: TypeRef) -> SourceExpr {
    SourceExpr::local(name, ty)
}

fn declare(name: &str, ty: TypeRef) -> SourceStmt {
    SourceStmt::Declare {
        name: name.to_string(),
        ty,
        init: None,
    }
}

fn float4(xyz: SourceExpr, w: SourceExpr) -> SourceExpr {
    SourceExpr::construct(TypeRef::float4(), vec![xyz, w])
}

fn float4_literal(x: f32, y: f32, z: f32, w: f32) -> SourceExpr {
    SourceExpr::construct(
        TypeRef::float4(),
        vec![
            SourceExpr::float(x),
            SourceExpr::float(y),
            SourceExpr::float(z),
            SourceExpr::float(w),
        ],
    )
}

fn mul(lhs: SourceExpr, rhs: SourceExpr, ty: TypeRef) -> SourceExpr {
    SourceExpr::binary(BinaryOp::Mul, lhs, rhs, ty)
}

fn set(name: &str, group: &str) -> ShaderSetDecl {
    ShaderSetDecl {
        name: name.to_string(),
        vertex: Some(qualified(group, "VS")),
        fragment: Some(qualified(group, "FS")),
    }
}

/// `{Position: float3, Color: float4}` in, `{Position: system position, Color}` out.
fn color_structs(group: &str) -> Vec<StructDecl> {
    vec![
        StructDecl {
            name: qualified(group, "VertexInput"),
            fields: vec![
                FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position),
                FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color),
            ],
        },
        StructDecl {
            name: qualified(group, "FragmentInput"),
            fields: vec![
                FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition),
                FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color),
            ],
        },
    ]
}

/// Copies the color through and places the position, optionally projected.
fn color_vs(group: &str, projected: bool, color: SourceExpr) -> FunctionDecl {
    let vertex_input = TypeRef::named(qualified(group, "VertexInput"));
    let fragment_input = TypeRef::named(qualified(group, "FragmentInput"));
    let input = local("input", vertex_input.clone());
    let output = local("output", fragment_input.clone());

    let position = float4(
        input.member("Position", TypeRef::float3()),
        SourceExpr::float(1.0),
    );
    let position = if projected {
        mul(SourceExpr::resource("Projection"), position, TypeRef::float4())
    } else {
        position
    };

    FunctionDecl::new(qualified(group, "VS"), fragment_input.clone())
        .stage(Stage::Vertex)
        .param(ParamDecl::new("input", vertex_input))
        .body(vec![
            declare("output", fragment_input),
            SourceStmt::assign(output.clone().member("Position", TypeRef::float4()), position),
            SourceStmt::assign(output.clone().member("Color", TypeRef::float4()), color),
            SourceStmt::ret(output),
        ])
}

fn vertex_color(group: &str) -> SourceExpr {
    local("input", TypeRef::named(qualified(group, "VertexInput"))).member("Color", TypeRef::float4())
}

fn fragment_input(group: &str) -> SourceExpr {
    local("input", TypeRef::named(qualified(group, "FragmentInput")))
}

fn fragment_color(group: &str) -> SourceExpr {
    fragment_input(group).member("Color", TypeRef::float4())
}

/// A fragment entry taking the group's `FragmentInput`.
fn fs(group: &str, return_type: TypeRef, body: Vec<SourceStmt>) -> FunctionDecl {
    FunctionDecl::new(qualified(group, "FS"), return_type)
        .stage(Stage::Fragment)
        .param(ParamDecl::new("input", TypeRef::named(qualified(group, "FragmentInput"))))
        .body(body)
}

fn fragment_only_structs(group: &str) -> StructDecl {
    StructDecl {
        name: qualified(group, "FragmentInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition),
            FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color),
        ],
    }
}

fn dispatch_id() -> ParamDecl {
    ParamDecl::new("id", TypeRef::uint3()).with_semantic(Semantic::DispatchThreadId)
}

fn id_x() -> SourceExpr {
    local("id", TypeRef::uint3()).member("x", TypeRef::uint())
}

fn basic(program: &mut ResolvedProgram) {
    program.structs.extend(color_structs("Basic"));
    program.functions.push(color_vs("Basic", true, vertex_color("Basic")));
    program
        .functions
        .push(fs("Basic", TypeRef::float4(), vec![SourceStmt::ret(fragment_color("Basic"))]));
    program.shader_sets.push(set("Basic", "Basic"));
}

fn vertex_and_fragment(program: &mut ResolvedProgram) {
    let vertex_input = TypeRef::named(qualified("VertexAndFragment", "VertexInput"));
    let fragment_input = TypeRef::named(qualified("VertexAndFragment", "FragmentInput"));
    program.structs.push(StructDecl {
        name: qualified("VertexAndFragment", "VertexInput"),
        fields: vec![
            FieldDecl::new("position", TypeRef::float3()).with_semantic(Semantic::Position),
            FieldDecl::new("color", TypeRef::float4()).with_semantic(Semantic::Color),
        ],
    });
    program.structs.push(StructDecl {
        name: qualified("VertexAndFragment", "FragmentInput"),
        fields: vec![
            FieldDecl::new("position", TypeRef::float4()).with_semantic(Semantic::SystemPosition),
            FieldDecl::new("color", TypeRef::float4()).with_semantic(Semantic::Color),
        ],
    });

    let input = local("input", vertex_input.clone());
    let output = local("output", fragment_input.clone());
    program.functions.push(
        FunctionDecl::new(qualified("VertexAndFragment", "VS"), fragment_input.clone())
            .stage(Stage::Vertex)
            .param(ParamDecl::new("input", vertex_input))
            .body(vec![
                declare("output", fragment_input.clone()),
                SourceStmt::assign(
                    output.clone().member("position", TypeRef::float4()),
                    float4(input.clone().member("position", TypeRef::float3()), SourceExpr::float(1.0)),
                ),
                SourceStmt::assign(
                    output.clone().member("color", TypeRef::float4()),
                    input.member("color", TypeRef::float4()),
                ),
                SourceStmt::ret(output),
            ]),
    );
    program.functions.push(
        FunctionDecl::new(qualified("VertexAndFragment", "FS"), TypeRef::float4())
            .stage(Stage::Fragment)
            .param(ParamDecl::new("input", fragment_input.clone()))
            .body(vec![SourceStmt::ret(
                local("input", fragment_input).member("color", TypeRef::float4()),
            )]),
    );
}

fn vertex_only(program: &mut ResolvedProgram) {
    let input = TypeRef::named(qualified("VertexOnly", "VertexInput"));
    program.structs.push(StructDecl {
        name: qualified("VertexOnly", "VertexInput"),
        fields: vec![FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position)],
    });
    program.functions.push(
        FunctionDecl::new(qualified("VertexOnly", "VS"), TypeRef::float4())
            .stage(Stage::Vertex)
            .param(ParamDecl::new("input", input.clone()))
            .body(vec![SourceStmt::ret(float4(
                local("input", input).member("Position", TypeRef::float3()),
                SourceExpr::float(1.0),
            ))]),
    );
}

fn fragment_only(program: &mut ResolvedProgram) {
    program.structs.push(fragment_only_structs("FragmentOnly"));
    program.functions.push(fs(
        "FragmentOnly",
        TypeRef::float4(),
        vec![SourceStmt::ret(mul(
            fragment_color("FragmentOnly"),
            SourceExpr::float(0.5),
            TypeRef::float4(),
        ))],
    ));
}

fn texture_sampler(program: &mut ResolvedProgram) {
    let group = "TextureSampler";
    program.structs.push(StructDecl {
        name: qualified(group, "VertexInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position),
            FieldDecl::new("TextureCoordinate", TypeRef::float2()).with_semantic(Semantic::TextureCoordinate),
        ],
    });
    program.structs.push(StructDecl {
        name: qualified(group, "FragmentInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition),
            FieldDecl::new("TextureCoordinate", TypeRef::float2()).with_semantic(Semantic::TextureCoordinate),
        ],
    });

    let vertex_input = TypeRef::named(qualified(group, "VertexInput"));
    let fragment_input = TypeRef::named(qualified(group, "FragmentInput"));
    let input = local("input", vertex_input.clone());
    let output = local("output", fragment_input.clone());
    program.functions.push(
        FunctionDecl::new(qualified(group, "VS"), fragment_input.clone())
            .stage(Stage::Vertex)
            .param(ParamDecl::new("input", vertex_input))
            .body(vec![
                declare("output", fragment_input.clone()),
                SourceStmt::assign(
                    output.clone().member("Position", TypeRef::float4()),
                    mul(
                        SourceExpr::resource("Projection"),
                        float4(input.clone().member("Position", TypeRef::float3()), SourceExpr::float(1.0)),
                        TypeRef::float4(),
                    ),
                ),
                SourceStmt::assign(
                    output.clone().member("TextureCoordinate", TypeRef::float2()),
                    input.member("TextureCoordinate", TypeRef::float2()),
                ),
                SourceStmt::ret(output),
            ]),
    );
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(SourceExpr::intrinsic(
            "Sample",
            vec![
                SourceExpr::resource("SurfaceTexture"),
                SourceExpr::resource("Sampler"),
                local("input", fragment_input).member("TextureCoordinate", TypeRef::float2()),
            ],
            TypeRef::float4(),
        ))],
    ));
    program.shader_sets.push(set(group, group));
}

fn complex_expression(program: &mut ResolvedProgram) {
    let group = "ComplexExpression";
    program.structs.push(fragment_only_structs(group));
    let c = local("c", TypeRef::float4());
    let t = local("t", TypeRef::float());
    let rgb = || c.clone().member("xyz", TypeRef::float3());

    let luminance = SourceExpr::intrinsic(
        "Saturate",
        vec![SourceExpr::intrinsic(
            "Dot",
            vec![
                rgb(),
                SourceExpr::construct(
                    TypeRef::float3(),
                    vec![SourceExpr::float(0.299), SourceExpr::float(0.587), SourceExpr::float(0.114)],
                ),
            ],
            TypeRef::float(),
        )],
        TypeRef::float(),
    );
    let amount = SourceExpr::intrinsic(
        "Clamp",
        vec![
            SourceExpr::binary(
                BinaryOp::Sub,
                mul(t.clone(), SourceExpr::float(2.0), TypeRef::float()),
                SourceExpr::float(0.5),
                TypeRef::float(),
            ),
            SourceExpr::float(0.0),
            SourceExpr::float(1.0),
        ],
        TypeRef::float(),
    );
    let mixed = SourceExpr::intrinsic(
        "Lerp",
        vec![rgb(), SourceExpr::construct(TypeRef::float3(), vec![t.clone()]), amount],
        TypeRef::float3(),
    );
    let alpha = SourceExpr::conditional(
        SourceExpr::binary(
            BinaryOp::Gt,
            c.clone().member("w", TypeRef::float()),
            SourceExpr::float(0.5),
            TypeRef::bool(),
        ),
        SourceExpr::float(1.0),
        c.clone().member("w", TypeRef::float()),
        TypeRef::float(),
    );

    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![
            SourceStmt::declare("c", TypeRef::float4(), fragment_color(group)),
            SourceStmt::declare("t", TypeRef::float(), luminance),
            SourceStmt::declare("mixed", TypeRef::float3(), mixed),
            SourceStmt::declare(
                "edge",
                TypeRef::float(),
                SourceExpr::intrinsic("Fwidth", vec![t], TypeRef::float()),
            ),
            SourceStmt::ret(float4(
                SourceExpr::binary(
                    BinaryOp::Add,
                    local("mixed", TypeRef::float3()),
                    SourceExpr::construct(TypeRef::float3(), vec![local("edge", TypeRef::float())]),
                    TypeRef::float3(),
                ),
                alpha,
            )),
        ],
    ));
}

fn swizzles(program: &mut ResolvedProgram) {
    let group = "Swizzles";
    program.structs.push(fragment_only_structs(group));
    let c = local("c", TypeRef::float4());
    let xy = local("xy", TypeRef::float2());
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![
            SourceStmt::declare("c", TypeRef::float4(), fragment_color(group)),
            SourceStmt::declare("xy", TypeRef::float2(), c.clone().member("xy", TypeRef::float2())),
            SourceStmt::assign(c.clone().member("zw", TypeRef::float2()), xy.member("yx", TypeRef::float2())),
            SourceStmt::assign(c.clone().member("r", TypeRef::float()), c.clone().member("g", TypeRef::float())),
            SourceStmt::ret(float4(c.member("bgr", TypeRef::float3()), SourceExpr::float(1.0))),
        ],
    ));
}

fn custom_method_calls(program: &mut ResolvedProgram) {
    let group = "CustomMethodCalls";
    program.structs.extend(color_structs(group));
    let shuffled = SourceExpr::call(qualified(group, "Shuffle"), vec![vertex_color(group)], TypeRef::float4());
    program.functions.push(color_vs(group, false, shuffled));
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(SourceExpr::call(
            qualified(group, "Scale"),
            vec![fragment_color(group), SourceExpr::float(0.5)],
            TypeRef::float4(),
        ))],
    ));

    let v = local("v", TypeRef::float4());
    program.functions.push(
        FunctionDecl::new(qualified(group, "Shuffle"), TypeRef::float4())
            .param(ParamDecl::new("v", TypeRef::float4()))
            .body(vec![SourceStmt::ret(SourceExpr::call(
                qualified(group, "Scale"),
                vec![v.clone().member("wzyx", TypeRef::float4()), SourceExpr::float(2.0)],
                TypeRef::float4(),
            ))]),
    );
    program.functions.push(
        FunctionDecl::new(qualified(group, "Scale"), TypeRef::float4())
            .param(ParamDecl::new("v", TypeRef::float4()))
            .param(ParamDecl::new("factor", TypeRef::float()))
            .body(vec![SourceStmt::ret(mul(v, local("factor", TypeRef::float()), TypeRef::float4()))]),
    );
    program.shader_sets.push(set(group, group));
}

fn built_in_variables(program: &mut ResolvedProgram) {
    program.functions.push(
        FunctionDecl::new(qualified("BuiltInVariables", "VS"), TypeRef::float4())
            .stage(Stage::Vertex)
            .param(ParamDecl::new("vertexId", TypeRef::uint()).with_semantic(Semantic::VertexIndex))
            .param(ParamDecl::new("instanceId", TypeRef::uint()).with_semantic(Semantic::InstanceIndex))
            .body(vec![SourceStmt::ret(SourceExpr::construct(
                TypeRef::float4(),
                vec![
                    SourceExpr::cast(TypeRef::float(), local("vertexId", TypeRef::uint())),
                    SourceExpr::cast(TypeRef::float(), local("instanceId", TypeRef::uint())),
                    SourceExpr::float(0.0),
                    SourceExpr::float(1.0),
                ],
            ))]),
    );
}

fn multiple_resource_sets(program: &mut ResolvedProgram) {
    let group = "MultipleResourceSets";
    program.structs.push(StructDecl {
        name: qualified(group, "FragmentInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition),
            FieldDecl::new("TextureCoordinate", TypeRef::float2()).with_semantic(Semantic::TextureCoordinate),
        ],
    });
    let sampled = SourceExpr::intrinsic(
        "Sample",
        vec![
            SourceExpr::resource("SetOneTexture"),
            SourceExpr::resource("SetOneSampler"),
            fragment_input(group).member("TextureCoordinate", TypeRef::float2()),
        ],
        TypeRef::float4(),
    );
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(mul(
            sampled,
            SourceExpr::resource("SetTwoTint"),
            TypeRef::float4(),
        ))],
    ));
}

fn multiple_color_output(program: &mut ResolvedProgram) {
    let group = "MultipleColorOutput";
    program.structs.extend(color_structs(group));
    program.structs.push(StructDecl {
        name: qualified(group, "Output"),
        fields: vec![
            FieldDecl::new("Color0", TypeRef::float4()).with_semantic(Semantic::ColorTarget(0)),
            FieldDecl::new("Color1", TypeRef::float4()).with_semantic(Semantic::ColorTarget(1)),
        ],
    });
    program.functions.push(color_vs(group, false, vertex_color(group)));

    let output_type = TypeRef::named(qualified(group, "Output"));
    let output = local("output", output_type.clone());
    program.functions.push(fs(
        group,
        output_type.clone(),
        vec![
            declare("output", output_type),
            SourceStmt::assign(output.clone().member("Color0", TypeRef::float4()), fragment_color(group)),
            SourceStmt::assign(
                output.clone().member("Color1", TypeRef::float4()),
                SourceExpr::binary(
                    BinaryOp::Sub,
                    float4_literal(1.0, 1.0, 1.0, 1.0),
                    fragment_color(group),
                    TypeRef::float4(),
                ),
            ),
            SourceStmt::ret(output),
        ],
    ));
    program.shader_sets.push(set(group, group));
}

fn multisample_texture(program: &mut ResolvedProgram) {
    let group = "MultisampleTexture";
    program.structs.extend(color_structs(group));
    program.functions.push(color_vs(group, false, vertex_color(group)));

    let position = fragment_input(group).member("Position", TypeRef::float4());
    let coordinates = SourceExpr::construct(
        TypeRef::Vector(ScalarKind::Int, 2),
        vec![
            SourceExpr::cast(TypeRef::int(), position.clone().member("x", TypeRef::float())),
            SourceExpr::cast(TypeRef::int(), position.member("y", TypeRef::float())),
        ],
    );
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(SourceExpr::intrinsic(
            "Load",
            vec![SourceExpr::resource("SceneTexture"), coordinates, SourceExpr::int(0)],
            TypeRef::float4(),
        ))],
    ));
    program.shader_sets.push(set(group, group));
}

fn matrix_members(program: &mut ResolvedProgram) {
    let input = TypeRef::named(qualified("MatrixMembers", "VertexInput"));
    program.structs.push(StructDecl {
        name: qualified("MatrixMembers", "VertexInput"),
        fields: vec![FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position)],
    });
    let m = local("m", TypeRef::matrix4x4());
    program.functions.push(
        FunctionDecl::new(qualified("MatrixMembers", "VS"), TypeRef::float4())
            .stage(Stage::Vertex)
            .param(ParamDecl::new("input", input.clone()))
            .body(vec![
                SourceStmt::declare("m", TypeRef::matrix4x4(), SourceExpr::resource("Projection")),
                SourceStmt::assign(m.clone().member("M41", TypeRef::float()), SourceExpr::float(1.0)),
                SourceStmt::compound(m.clone(), AssignOp::Mul, SourceExpr::resource("Projection")),
                SourceStmt::ret(mul(
                    m.clone(),
                    float4(
                        local("input", input).member("Position", TypeRef::float3()),
                        m.member("M11", TypeRef::float()),
                    ),
                    TypeRef::float4(),
                )),
            ]),
    );
}

fn out_parameters(program: &mut ResolvedProgram) {
    let group = "OutParameters";
    program.structs.push(fragment_only_structs(group));
    let rgb = local("rgb", TypeRef::float3());
    let alpha = local("alpha", TypeRef::float());
    let v = local("v", TypeRef::float4());
    program.functions.push(
        FunctionDecl::new(qualified(group, "Split"), TypeRef::Void)
            .param(ParamDecl::new("v", TypeRef::float4()))
            .param(ParamDecl::new("rgb", TypeRef::float3()).with_direction(ParamDirection::Out))
            .param(ParamDecl::new("alpha", TypeRef::float()).with_direction(ParamDirection::InOut))
            .body(vec![
                SourceStmt::assign(rgb.clone(), v.clone().member("xyz", TypeRef::float3())),
                SourceStmt::assign(
                    alpha.clone(),
                    mul(alpha.clone(), v.member("w", TypeRef::float()), TypeRef::float()),
                ),
            ]),
    );
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![
            declare("rgb", TypeRef::float3()),
            SourceStmt::declare("alpha", TypeRef::float(), SourceExpr::float(0.5)),
            SourceStmt::Expr(SourceExpr::call(
                qualified(group, "Split"),
                vec![fragment_color(group), rgb.clone(), alpha.clone()],
                TypeRef::Void,
            )),
            SourceStmt::ret(float4(rgb, alpha)),
        ],
    ));
}

fn switch_statements(program: &mut ResolvedProgram) {
    let group = "Switch";
    program.structs.push(fragment_only_structs(group));
    let result = local("result", TypeRef::float4());
    let write = |component: &str| {
        vec![
            SourceStmt::assign(result.clone().member(component, TypeRef::float()), SourceExpr::float(1.0)),
            SourceStmt::Break,
        ]
    };
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![
            SourceStmt::declare(
                "mode",
                TypeRef::int(),
                SourceExpr::cast(
                    TypeRef::int(),
                    mul(
                        fragment_color(group).member("x", TypeRef::float()),
                        SourceExpr::float(3.0),
                        TypeRef::float(),
                    ),
                ),
            ),
            SourceStmt::declare("result", TypeRef::float4(), float4_literal(0.0, 0.0, 0.0, 1.0)),
            SourceStmt::Switch {
                selector: local("mode", TypeRef::int()),
                cases: vec![
                    SourceSwitchCase {
                        labels: vec![SourceExpr::int(0)],
                        body: write("x"),
                    },
                    SourceSwitchCase {
                        labels: vec![SourceExpr::int(1), SourceExpr::int(2)],
                        body: write("y"),
                    },
                ],
                default: Some(write("z")),
            },
            SourceStmt::ret(result.clone()),
        ],
    ));
}

fn enums(program: &mut ResolvedProgram) {
    let group = "Enums";
    program.structs.push(fragment_only_structs(group));
    let additive = || {
        SourceExpr::new(
            SourceExprKind::EnumValue {
                enum_name: "TestShaders.Enums.BlendMode".to_string(),
                member: "Additive".to_string(),
                value: 1,
            },
            TypeRef::int(),
        )
    };
    let result = local("result", TypeRef::float4());
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![
            SourceStmt::declare("mode", TypeRef::int(), additive()),
            SourceStmt::declare("result", TypeRef::float4(), fragment_color(group)),
            SourceStmt::If {
                condition: SourceExpr::binary(
                    BinaryOp::Eq,
                    local("mode", TypeRef::int()),
                    additive(),
                    TypeRef::bool(),
                ),
                then: vec![SourceStmt::compound(
                    result.clone(),
                    AssignOp::Add,
                    float4_literal(0.1, 0.1, 0.1, 0.0),
                )],
                otherwise: Some(vec![SourceStmt::compound(
                    result.clone(),
                    AssignOp::Mul,
                    SourceExpr::float(0.5),
                )]),
            },
            SourceStmt::ret(result),
        ],
    ));
}

fn expression_bodied(program: &mut ResolvedProgram) {
    let group = "ExpressionBodied";
    program.structs.push(fragment_only_structs(group));
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(mul(
            fragment_color(group),
            float4_literal(0.5, 0.5, 0.5, 1.0),
            TypeRef::float4(),
        ))],
    ));
}

fn structured_buffer(program: &mut ResolvedProgram) {
    let light_type = TypeRef::named(qualified("StructuredBuffer", "Light"));
    program.structs.push(StructDecl {
        name: qualified("StructuredBuffer", "Light"),
        fields: vec![
            FieldDecl::new("Color", TypeRef::float4()),
            FieldDecl::new("Intensity", TypeRef::float()),
        ],
    });
    let light = local("light", light_type.clone());
    program.functions.push(
        FunctionDecl::new(qualified("StructuredBuffer", "CS"), TypeRef::Void)
            .stage(Stage::Compute)
            .thread_group_size(64, 1, 1)
            .param(dispatch_id())
            .body(vec![
                SourceStmt::declare(
                    "light",
                    light_type.clone(),
                    SourceExpr::resource("Lights").index(id_x(), light_type),
                ),
                SourceStmt::assign(
                    SourceExpr::resource("LitColors").index(id_x(), TypeRef::float4()),
                    mul(
                        light.clone().member("Color", TypeRef::float4()),
                        light.member("Intensity", TypeRef::float()),
                        TypeRef::float4(),
                    ),
                ),
            ]),
    );
}

fn simple_compute(program: &mut ResolvedProgram) {
    let value = || SourceExpr::resource("Values").index(id_x(), TypeRef::float());
    program.functions.push(
        FunctionDecl::new(qualified("SimpleCompute", "CS"), TypeRef::Void)
            .stage(Stage::Compute)
            .thread_group_size(16, 16, 1)
            .param(dispatch_id())
            .body(vec![SourceStmt::assign(
                value(),
                mul(value(), SourceExpr::float(2.0), TypeRef::float()),
            )]),
    );
}

fn complex_compute(program: &mut ResolvedProgram) {
    let group = "ComplexCompute";
    let particle_type = TypeRef::named(qualified(group, "Particle"));
    // Declared ahead of the struct it depends on.
    program.structs.push(StructDecl {
        name: qualified(group, "Particle"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float3()),
            FieldDecl::new("Velocity", TypeRef::float3()),
            FieldDecl::new("Physics", TypeRef::named(qualified(group, "Physics"))),
        ],
    });
    program.structs.push(StructDecl {
        name: qualified(group, "Physics"),
        fields: vec![
            FieldDecl::new("Mass", TypeRef::float()),
            FieldDecl::new("Drag", TypeRef::float()),
        ],
    });
    program.structs.push(StructDecl {
        name: qualified(group, "Params"),
        fields: vec![
            FieldDecl::new("DeltaTime", TypeRef::float()),
            FieldDecl::new("Count", TypeRef::uint()),
            FieldDecl::new("Gravity", TypeRef::float()),
        ],
    });

    let params = || SourceExpr::resource("ComplexComputeParams");
    let p = local("p", particle_type.clone());
    let dt = local("dt", TypeRef::float());
    let i = local("i", TypeRef::int());
    let particle = || SourceExpr::resource("Particles").index(id_x(), particle_type.clone());
    let physics = || p.clone().member("Physics", TypeRef::named(qualified(group, "Physics")));

    let fall = SourceExpr::binary(
        BinaryOp::Div,
        mul(params().member("Gravity", TypeRef::float()), dt.clone(), TypeRef::float()),
        physics().member("Mass", TypeRef::float()),
        TypeRef::float(),
    );
    let damping = SourceExpr::binary(
        BinaryOp::Sub,
        SourceExpr::float(1.0),
        mul(physics().member("Drag", TypeRef::float()), dt.clone(), TypeRef::float()),
        TypeRef::float(),
    );

    program.functions.push(
        FunctionDecl::new(qualified(group, "CS"), TypeRef::Void)
            .stage(Stage::Compute)
            .thread_group_size(64, 1, 1)
            .param(dispatch_id())
            .param(ParamDecl::new("groupThread", TypeRef::uint3()).with_semantic(Semantic::GroupThreadId))
            .body(vec![
                SourceStmt::If {
                    condition: SourceExpr::binary(
                        BinaryOp::Ge,
                        id_x(),
                        params().member("Count", TypeRef::uint()),
                        TypeRef::bool(),
                    ),
                    then: vec![SourceStmt::Return(None)],
                    otherwise: None,
                },
                SourceStmt::declare("p", particle_type.clone(), particle()),
                SourceStmt::declare("dt", TypeRef::float(), params().member("DeltaTime", TypeRef::float())),
                SourceStmt::For {
                    init: vec![SourceStmt::declare("i", TypeRef::int(), SourceExpr::int(0))],
                    condition: Some(SourceExpr::binary(
                        BinaryOp::Lt,
                        i.clone(),
                        SourceExpr::int(4),
                        TypeRef::bool(),
                    )),
                    step: vec![SourceStmt::Expr(SourceExpr::unary(UnaryOp::PostIncrement, i, TypeRef::int()))],
                    body: vec![SourceStmt::compound(
                        p.clone()
                            .member("Velocity", TypeRef::float3())
                            .member("y", TypeRef::float()),
                        AssignOp::Sub,
                        SourceExpr::binary(BinaryOp::Div, fall, SourceExpr::float(4.0), TypeRef::float()),
                    )],
                },
                SourceStmt::assign(
                    p.clone().member("Velocity", TypeRef::float3()),
                    mul(p.clone().member("Velocity", TypeRef::float3()), damping, TypeRef::float3()),
                ),
                SourceStmt::compound(
                    p.clone().member("Position", TypeRef::float3()),
                    AssignOp::Add,
                    mul(p.clone().member("Velocity", TypeRef::float3()), dt, TypeRef::float3()),
                ),
                SourceStmt::Expr(SourceExpr::intrinsic("Barrier", Vec::new(), TypeRef::Void)),
                SourceStmt::assign(particle(), p),
            ]),
    );
}

fn vs(group: &str, return_type: TypeRef, body: Vec<SourceStmt>) -> FunctionDecl {
    FunctionDecl::new(qualified(group, "VS"), return_type)
        .stage(Stage::Vertex)
        .body(body)
}

/// `{Position: float3}`, the smallest vertex input.
fn position_input(group: &str) -> StructDecl {
    StructDecl {
        name: qualified(group, "VertexInput"),
        fields: vec![FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position)],
    }
}

fn input_position(group: &str) -> SourceExpr {
    local("input", TypeRef::named(qualified(group, "VertexInput"))).member("Position", TypeRef::float3())
}

fn add(lhs: SourceExpr, rhs: SourceExpr, ty: TypeRef) -> SourceExpr {
    SourceExpr::binary(BinaryOp::Add, lhs, rhs, ty)
}

fn int_loop(bound: SourceExpr, body: Vec<SourceStmt>) -> SourceStmt {
    let i = local("i", TypeRef::int());
    SourceStmt::For {
        init: vec![SourceStmt::declare("i", TypeRef::int(), SourceExpr::int(0))],
        condition: Some(SourceExpr::binary(BinaryOp::Lt, i.clone(), bound, TypeRef::bool())),
        step: vec![SourceStmt::Expr(SourceExpr::unary(UnaryOp::PostIncrement, i, TypeRef::int()))],
        body,
    }
}

fn vector_constructors(program: &mut ResolvedProgram) {
    let int2 = TypeRef::Vector(ScalarKind::Int, 2);
    let a = local("a", TypeRef::float2());
    let b = local("b", TypeRef::float3());
    let u = local("u", TypeRef::uint3());
    program.functions.push(vs(
        "VectorConstructors",
        TypeRef::float4(),
        vec![
            SourceStmt::declare(
                "a",
                TypeRef::float2(),
                SourceExpr::construct(TypeRef::float2(), vec![SourceExpr::float(1.0), SourceExpr::float(2.0)]),
            ),
            SourceStmt::declare(
                "b",
                TypeRef::float3(),
                SourceExpr::construct(TypeRef::float3(), vec![a.clone(), SourceExpr::float(3.0)]),
            ),
            SourceStmt::declare("c", TypeRef::float4(), float4(b, SourceExpr::float(4.0))),
            SourceStmt::declare(
                "d",
                TypeRef::float4(),
                SourceExpr::construct(TypeRef::float4(), vec![a.clone(), a]),
            ),
            SourceStmt::declare(
                "e",
                TypeRef::float4(),
                SourceExpr::construct(TypeRef::float4(), vec![SourceExpr::float(0.5)]),
            ),
            SourceStmt::declare(
                "i",
                int2.clone(),
                SourceExpr::construct(int2.clone(), vec![SourceExpr::int(1), SourceExpr::int(2)]),
            ),
            SourceStmt::declare(
                "u",
                TypeRef::uint3(),
                SourceExpr::construct(TypeRef::uint3(), vec![SourceExpr::uint(7)]),
            ),
            SourceStmt::ret(add(
                add(
                    add(local("c", TypeRef::float4()), local("d", TypeRef::float4()), TypeRef::float4()),
                    local("e", TypeRef::float4()),
                    TypeRef::float4(),
                ),
                SourceExpr::construct(
                    TypeRef::float4(),
                    vec![
                        SourceExpr::cast(TypeRef::float2(), local("i", int2)),
                        SourceExpr::cast(TypeRef::float2(), u.member("xy", TypeRef::Vector(ScalarKind::UInt, 2))),
                    ],
                ),
                TypeRef::float4(),
            )),
        ],
    ));
}

fn vector_indexers(program: &mut ResolvedProgram) {
    let v = || local("v", TypeRef::float4());
    let at = |index: SourceExpr| v().index(index, TypeRef::float());
    program.functions.push(vs(
        "VectorIndexers",
        TypeRef::float4(),
        vec![
            SourceStmt::declare("v", TypeRef::float4(), float4_literal(1.0, 2.0, 3.0, 4.0)),
            int_loop(
                SourceExpr::int(3),
                vec![SourceStmt::compound(
                    at(local("i", TypeRef::int())),
                    AssignOp::Mul,
                    SourceExpr::float(2.0),
                )],
            ),
            SourceStmt::assign(
                at(SourceExpr::int(3)),
                add(at(SourceExpr::int(0)), at(SourceExpr::uint(1)), TypeRef::float()),
            ),
            SourceStmt::ret(v()),
        ],
    ));
}

/// `Vector4.One`, `Vector4.UnitX` and friends arrive as constant constructions.
fn vector_static_properties(program: &mut ResolvedProgram) {
    let one = SourceExpr::construct(TypeRef::float4(), vec![SourceExpr::float(1.0)]);
    let zero = SourceExpr::construct(TypeRef::float4(), vec![SourceExpr::float(0.0)]);
    program.functions.push(vs(
        "VectorStaticProperties",
        TypeRef::float4(),
        vec![
            SourceStmt::declare("one", TypeRef::float4(), one),
            SourceStmt::declare("zero", TypeRef::float4(), zero),
            SourceStmt::declare("unitX", TypeRef::float4(), float4_literal(1.0, 0.0, 0.0, 0.0)),
            SourceStmt::declare("unitW", TypeRef::float4(), float4_literal(0.0, 0.0, 0.0, 1.0)),
            SourceStmt::ret(add(
                SourceExpr::binary(
                    BinaryOp::Sub,
                    local("one", TypeRef::float4()),
                    local("zero", TypeRef::float4()),
                    TypeRef::float4(),
                ),
                add(
                    mul(local("unitX", TypeRef::float4()), SourceExpr::float(0.5), TypeRef::float4()),
                    local("unitW", TypeRef::float4()),
                    TypeRef::float4(),
                ),
                TypeRef::float4(),
            )),
        ],
    ));
}

fn vector_static_functions(program: &mut ResolvedProgram) {
    let float3 = TypeRef::float3;
    let a = || local("a", float3());
    let b = || local("b", float3());
    let splat3 = |value: f32| SourceExpr::construct(float3(), vec![SourceExpr::float(value)]);
    let call = |name: &str, args: Vec<SourceExpr>, ty: TypeRef| SourceExpr::intrinsic(name, args, ty);

    let measure = add(
        add(
            call("Dot", vec![a(), local("c", float3())], TypeRef::float()),
            call("Distance", vec![a(), b()], TypeRef::float()),
            TypeRef::float(),
        ),
        call("Length", vec![local("c", float3())], TypeRef::float()),
        TypeRef::float(),
    );
    let blended = call(
        "Lerp",
        vec![
            call("Min", vec![a(), b()], float3()),
            call("Max", vec![a(), b()], float3()),
            splat3(0.5),
        ],
        float3(),
    );
    let reflected = call(
        "Clamp",
        vec![
            call("Reflect", vec![local("e", float3()), b()], float3()),
            splat3(0.0),
            splat3(1.0),
        ],
        float3(),
    );

    program.functions.push(vs(
        "VectorStaticFunctions",
        TypeRef::float4(),
        vec![
            SourceStmt::declare(
                "a",
                float3(),
                SourceExpr::construct(
                    float3(),
                    vec![SourceExpr::float(1.0), SourceExpr::float(2.0), SourceExpr::float(3.0)],
                ),
            ),
            SourceStmt::declare("b", float3(), call("Normalize", vec![a()], float3())),
            SourceStmt::declare("c", float3(), call("Cross", vec![a(), b()], float3())),
            SourceStmt::declare("d", TypeRef::float(), measure),
            SourceStmt::declare("e", float3(), blended),
            SourceStmt::declare("f", float3(), reflected),
            SourceStmt::ret(float4(
                mul(local("f", float3()), local("d", TypeRef::float()), float3()),
                SourceExpr::float(1.0),
            )),
        ],
    ));
}

/// Every component-wise math intrinsic that is valid outside fragment stages.
fn math_functions(program: &mut ResolvedProgram) {
    const UNARY: [&str; 23] = [
        "Abs", "Acos", "Asin", "Atan", "Ceiling", "Cos", "Cosh", "Exp", "Exp2", "Floor", "Frac", "Log",
        "Log2", "Round", "Rsqrt", "Saturate", "Sign", "Sin", "Sinh", "Sqrt", "Tan", "Tanh", "Truncate",
    ];
    const BINARY: [&str; 5] = ["Atan2", "Max", "Min", "Pow", "Step"];
    const TERNARY: [&str; 3] = ["Clamp", "Lerp", "SmoothStep"];

    let r = || local("r", TypeRef::float4());
    let mid = || local("mid", TypeRef::float4());
    let one = || local("one", TypeRef::float4());
    let apply = |name: &str, args: Vec<SourceExpr>| {
        SourceStmt::assign(r(), SourceExpr::intrinsic(name, args, TypeRef::float4()))
    };

    let mut body = vec![
        SourceStmt::declare("r", TypeRef::float4(), float4_literal(0.1, 0.2, 0.3, 0.4)),
        SourceStmt::declare(
            "mid",
            TypeRef::float4(),
            SourceExpr::construct(TypeRef::float4(), vec![SourceExpr::float(0.5)]),
        ),
        SourceStmt::declare(
            "one",
            TypeRef::float4(),
            SourceExpr::construct(TypeRef::float4(), vec![SourceExpr::float(1.0)]),
        ),
    ];
    body.extend(UNARY.into_iter().map(|name| apply(name, vec![r()])));
    body.extend(BINARY.into_iter().map(|name| apply(name, vec![r(), mid()])));
    body.extend(TERNARY.into_iter().map(|name| apply(name, vec![r(), mid(), one()])));
    body.push(SourceStmt::ret(r()));

    program.functions.push(vs("MathFunctions", TypeRef::float4(), body));
}

fn custom_method_using_uniform(program: &mut ResolvedProgram) {
    let group = "CustomMethodUsingUniform";
    program.structs.push(position_input(group));
    program.functions.push(
        vs(
            group,
            TypeRef::float4(),
            vec![SourceStmt::ret(SourceExpr::call(
                qualified(group, "Project"),
                vec![input_position(group)],
                TypeRef::float4(),
            ))],
        )
        .param(ParamDecl::new("input", TypeRef::named(qualified(group, "VertexInput")))),
    );
    program.functions.push(
        FunctionDecl::new(qualified(group, "Project"), TypeRef::float4())
            .param(ParamDecl::new("position", TypeRef::float3()))
            .body(vec![SourceStmt::ret(mul(
                SourceExpr::resource("Projection"),
                float4(local("position", TypeRef::float3()), SourceExpr::float(1.0)),
                TypeRef::float4(),
            ))]),
    );
}

/// A uniform holding a count and a fixed array of light structs.
fn point_light(program: &mut ResolvedProgram) {
    let group = "PointLight";
    let info = TypeRef::named(qualified(group, "PointLightInfo"));
    let lights = TypeRef::Array(Box::new(info.clone()), 4);
    program.structs.push(position_input(group));
    program.structs.push(StructDecl {
        name: qualified(group, "PointLightInfo"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float3()),
            FieldDecl::new("Range", TypeRef::float()),
            FieldDecl::new("Color", TypeRef::float3()),
            FieldDecl::new("Padding", TypeRef::float()),
        ],
    });
    program.structs.push(StructDecl {
        name: qualified(group, "PointLightsInfo"),
        fields: vec![
            FieldDecl::new("NumActiveLights", TypeRef::int()),
            FieldDecl::new("Padding0", TypeRef::float()),
            FieldDecl::new("Padding1", TypeRef::float()),
            FieldDecl::new("Padding2", TypeRef::float()),
            FieldDecl::new("PointLights", lights.clone()),
        ],
    });

    let light = || {
        SourceExpr::resource("PointLights")
            .member("PointLights", lights.clone())
            .index(local("i", TypeRef::int()), info.clone())
    };
    let total = local("total", TypeRef::float3());
    program.functions.push(
        vs(
            group,
            TypeRef::float4(),
            vec![
                SourceStmt::declare(
                    "total",
                    TypeRef::float3(),
                    SourceExpr::construct(TypeRef::float3(), vec![SourceExpr::float(0.0)]),
                ),
                int_loop(
                    SourceExpr::resource("PointLights").member("NumActiveLights", TypeRef::int()),
                    vec![SourceStmt::compound(
                        total.clone(),
                        AssignOp::Add,
                        mul(
                            light().member("Color", TypeRef::float3()),
                            light().member("Range", TypeRef::float()),
                            TypeRef::float3(),
                        ),
                    )],
                ),
                SourceStmt::ret(float4(
                    add(total, input_position(group), TypeRef::float3()),
                    SourceExpr::float(1.0),
                )),
            ],
        )
        .param(ParamDecl::new("input", TypeRef::named(qualified(group, "VertexInput")))),
    );
}

fn uint_vectors(program: &mut ResolvedProgram) {
    let uint2 = TypeRef::Vector(ScalarKind::UInt, 2);
    let uint4 = TypeRef::Vector(ScalarKind::UInt, 4);
    let c = || local("c", uint4.clone());
    program.functions.push(vs(
        "UIntVectors",
        TypeRef::float4(),
        vec![
            SourceStmt::declare(
                "a",
                uint2.clone(),
                SourceExpr::construct(uint2.clone(), vec![SourceExpr::uint(1), SourceExpr::uint(2)]),
            ),
            SourceStmt::declare(
                "b",
                TypeRef::uint3(),
                SourceExpr::construct(TypeRef::uint3(), vec![local("a", uint2), SourceExpr::uint(3)]),
            ),
            SourceStmt::declare(
                "c",
                uint4.clone(),
                SourceExpr::construct(uint4.clone(), vec![local("b", TypeRef::uint3()), SourceExpr::uint(4)]),
            ),
            SourceStmt::assign(
                c(),
                add(c(), SourceExpr::construct(uint4.clone(), vec![SourceExpr::uint(1)]), uint4.clone()),
            ),
            SourceStmt::assign(
                c().member("x", TypeRef::uint()),
                mul(c().member("y", TypeRef::uint()), SourceExpr::uint(2), TypeRef::uint()),
            ),
            SourceStmt::ret(SourceExpr::cast(TypeRef::float4(), c())),
        ],
    ));
}

/// Integer vertex attributes, normalized before they are passed on.
fn uint_vertex_attribs(program: &mut ResolvedProgram) {
    let group = "UIntVertexAttribs";
    let uint4 = TypeRef::Vector(ScalarKind::UInt, 4);
    let vertex_input = TypeRef::named(qualified(group, "VertexInput"));
    let output_type = TypeRef::named(qualified(group, "FragmentInput"));
    program.structs.push(StructDecl {
        name: qualified(group, "VertexInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position),
            FieldDecl::new("Color", uint4.clone()).with_semantic(Semantic::Color),
        ],
    });
    program.structs.push(StructDecl {
        name: qualified(group, "FragmentInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition),
            FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color),
        ],
    });

    let input = local("input", vertex_input.clone());
    let output = local("output", output_type.clone());
    program.functions.push(
        vs(
            group,
            output_type.clone(),
            vec![
                declare("output", output_type),
                SourceStmt::assign(
                    output.clone().member("Position", TypeRef::float4()),
                    float4(input.clone().member("Position", TypeRef::float3()), SourceExpr::float(1.0)),
                ),
                SourceStmt::assign(
                    output.clone().member("Color", TypeRef::float4()),
                    SourceExpr::binary(
                        BinaryOp::Div,
                        SourceExpr::cast(TypeRef::float4(), input.member("Color", uint4)),
                        SourceExpr::float(255.0),
                        TypeRef::float4(),
                    ),
                ),
                SourceStmt::ret(output),
            ],
        )
        .param(ParamDecl::new("input", vertex_input)),
    );
}

fn variable_types(program: &mut ResolvedProgram) {
    let values = TypeRef::Array(Box::new(TypeRef::float()), 4);
    let f = || local("f", TypeRef::float());
    program.functions.push(vs(
        "VariableTypes",
        TypeRef::float4(),
        vec![
            SourceStmt::declare("flag", TypeRef::bool(), SourceExpr::bool(true)),
            SourceStmt::declare("i", TypeRef::int(), SourceExpr::int(1)),
            SourceStmt::declare("u", TypeRef::uint(), SourceExpr::uint(2)),
            SourceStmt::declare("f", TypeRef::float(), SourceExpr::float(3.0)),
            SourceStmt::declare(
                "f2",
                TypeRef::float2(),
                SourceExpr::construct(TypeRef::float2(), vec![f()]),
            ),
            SourceStmt::declare("m", TypeRef::matrix4x4(), SourceExpr::resource("Projection")),
            declare("values", values.clone()),
            SourceStmt::assign(local("values", values.clone()).index(SourceExpr::int(0), TypeRef::float()), f()),
            SourceStmt::If {
                condition: local("flag", TypeRef::bool()),
                then: vec![SourceStmt::assign(
                    local("values", values.clone()).index(SourceExpr::int(1), TypeRef::float()),
                    add(
                        SourceExpr::cast(TypeRef::float(), local("i", TypeRef::int())),
                        SourceExpr::cast(TypeRef::float(), local("u", TypeRef::uint())),
                        TypeRef::float(),
                    ),
                )],
                otherwise: None,
            },
            SourceStmt::ret(mul(
                local("m", TypeRef::matrix4x4()),
                SourceExpr::construct(
                    TypeRef::float4(),
                    vec![
                        local("f2", TypeRef::float2()),
                        local("values", values.clone()).index(SourceExpr::int(0), TypeRef::float()),
                        local("values", values).index(SourceExpr::int(1), TypeRef::float()),
                    ],
                ),
                TypeRef::float4(),
            )),
        ],
    ));
}

fn depth_texture_sampler(program: &mut ResolvedProgram) {
    let group = "DepthTextureSamplerFragment";
    program.structs.push(fragment_only_structs(group));
    let coordinates = || fragment_color(group).member("xy", TypeRef::float2());
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![
            SourceStmt::declare(
                "depth",
                TypeRef::float(),
                SourceExpr::intrinsic(
                    "Sample",
                    vec![SourceExpr::resource("ShadowMap"), SourceExpr::resource("ShadowSampler"), coordinates()],
                    TypeRef::float(),
                ),
            ),
            SourceStmt::declare(
                "coarse",
                TypeRef::float(),
                SourceExpr::intrinsic(
                    "SampleLevel",
                    vec![
                        SourceExpr::resource("ShadowMap"),
                        SourceExpr::resource("ShadowSampler"),
                        coordinates(),
                        SourceExpr::float(1.0),
                    ],
                    TypeRef::float(),
                ),
            ),
            SourceStmt::ret(SourceExpr::construct(
                TypeRef::float4(),
                vec![
                    local("depth", TypeRef::float()),
                    local("coarse", TypeRef::float()),
                    SourceExpr::float(0.0),
                    SourceExpr::float(1.0),
                ],
            )),
        ],
    ));
}

/// The layer travels in the third coordinate.
fn texture_array_sampler(program: &mut ResolvedProgram) {
    let group = "TextureArraySampler";
    program.structs.push(fragment_only_structs(group));
    let color = || fragment_color(group);
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(SourceExpr::intrinsic(
            "Sample",
            vec![
                SourceExpr::resource("LayerTexture"),
                SourceExpr::resource("Sampler"),
                SourceExpr::construct(
                    TypeRef::float3(),
                    vec![
                        color().member("xy", TypeRef::float2()),
                        color().member("z", TypeRef::float()),
                    ],
                ),
            ],
            TypeRef::float4(),
        ))],
    ));
}

fn texture_cube_sampler(program: &mut ResolvedProgram) {
    let group = "TextureCubeSampler";
    program.structs.push(fragment_only_structs(group));
    let direction = SourceExpr::intrinsic(
        "Normalize",
        vec![fragment_color(group).member("xyz", TypeRef::float3())],
        TypeRef::float3(),
    );
    program.functions.push(fs(
        group,
        TypeRef::float4(),
        vec![SourceStmt::ret(SourceExpr::intrinsic(
            "SampleLevel",
            vec![
                SourceExpr::resource("Environment"),
                SourceExpr::resource("Sampler"),
                direction,
                SourceExpr::float(2.0),
            ],
            TypeRef::float4(),
        ))],
    ));
}

/// Reads a read-only structured buffer from the vertex stage.
fn vertex_with_structured_buffer(program: &mut ResolvedProgram) {
    program.functions.push(
        vs(
            "VertexWithStructuredBuffer",
            TypeRef::float4(),
            vec![SourceStmt::ret(
                SourceExpr::resource("VertexOffsets").index(local("vertexId", TypeRef::uint()), TypeRef::float4()),
            )],
        )
        .param(ParamDecl::new("vertexId", TypeRef::uint()).with_semantic(Semantic::VertexIndex)),
    );
}

/// A depth-only pass: the fragment stage writes no color.
fn shadow_depth(program: &mut ResolvedProgram) {
    let group = "ShadowDepth";
    let vertex_input = TypeRef::named(qualified(group, "VertexInput"));
    let fragment_input = TypeRef::named(qualified(group, "FragmentInput"));
    program.structs.push(position_input(group));
    program.structs.push(StructDecl {
        name: qualified(group, "FragmentInput"),
        fields: vec![FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition)],
    });

    let output = local("output", fragment_input.clone());
    program.functions.push(
        vs(
            group,
            fragment_input.clone(),
            vec![
                declare("output", fragment_input.clone()),
                SourceStmt::assign(
                    output.clone().member("Position", TypeRef::float4()),
                    mul(
                        SourceExpr::resource("Projection"),
                        float4(input_position(group), SourceExpr::float(1.0)),
                        TypeRef::float4(),
                    ),
                ),
                SourceStmt::ret(output),
            ],
        )
        .param(ParamDecl::new("input", vertex_input)),
    );
    program.functions.push(fs(group, TypeRef::Void, Vec::new()));
    program.shader_sets.push(set(group, group));
}

fn custom_struct_resource(program: &mut ResolvedProgram) {
    let group = "CustomStructResource";
    program.structs.push(position_input(group));
    program.structs.push(StructDecl {
        name: qualified(group, "Material"),
        fields: vec![
            FieldDecl::new("Tint", TypeRef::float4()),
            FieldDecl::new("Padding", TypeRef::float3()),
            FieldDecl::new("Scale", TypeRef::float()),
        ],
    });
    let material = || SourceExpr::resource("Material");
    program.functions.push(
        vs(
            group,
            TypeRef::float4(),
            vec![SourceStmt::ret(mul(
                float4(
                    mul(
                        input_position(group),
                        material().member("Scale", TypeRef::float()),
                        TypeRef::float3(),
                    ),
                    SourceExpr::float(1.0),
                ),
                material().member("Tint", TypeRef::float4()),
                TypeRef::float4(),
            ))],
        )
        .param(ParamDecl::new("input", TypeRef::named(qualified(group, "VertexInput")))),
    );
}

/// Declares more attributes than the entry reads.
fn partial_vertex(program: &mut ResolvedProgram) {
    let group = "PartialVertex";
    let input = TypeRef::named(qualified(group, "VertexInput"));
    program.structs.push(StructDecl {
        name: qualified(group, "VertexInput"),
        fields: vec![
            FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::Position),
            FieldDecl::new("Normal", TypeRef::float3()).with_semantic(Semantic::Normal),
            FieldDecl::new("TexCoord", TypeRef::float2()).with_semantic(Semantic::TextureCoordinate),
            FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color),
        ],
    });
    program.functions.push(
        FunctionDecl::new(qualified(group, "VertexShaderFunc"), TypeRef::float4())
            .stage(Stage::Vertex)
            .param(ParamDecl::new("input", input))
            .body(vec![SourceStmt::ret(float4(input_position(group), SourceExpr::float(1.0)))]),
    );
}

/// The shader catalogue: every supported feature in one program.
pub(crate) fn catalogue() -> ResolvedProgram {
    let mut program = ResolvedProgram {
        resources: vec![
            ResourceDecl::uniform("Projection", TypeRef::matrix4x4()),
            ResourceDecl::new("SurfaceTexture", ResourceKind::Texture2D),
            ResourceDecl::new("Sampler", ResourceKind::Sampler),
            ResourceDecl::new("SceneTexture", ResourceKind::Texture2DMS),
            ResourceDecl::new("SetOneTexture", ResourceKind::Texture2D).at(1, 0),
            ResourceDecl::new("SetOneSampler", ResourceKind::Sampler).at(1, 1),
            ResourceDecl::uniform("SetTwoTint", TypeRef::float4()).at(2, 0),
            ResourceDecl::structured("Values", TypeRef::float(), AccessMode::ReadWrite),
            ResourceDecl::structured(
                "Lights",
                TypeRef::named(qualified("StructuredBuffer", "Light")),
                AccessMode::ReadOnly,
            ),
            ResourceDecl::structured("LitColors", TypeRef::float4(), AccessMode::ReadWrite),
            ResourceDecl::structured(
                "Particles",
                TypeRef::named(qualified("ComplexCompute", "Particle")),
                AccessMode::ReadWrite,
            ),
            ResourceDecl::uniform(
                "ComplexComputeParams",
                TypeRef::named(qualified("ComplexCompute", "Params")),
            ),
            ResourceDecl::new("ShadowMap", ResourceKind::DepthTexture2D),
            ResourceDecl::new("ShadowSampler", ResourceKind::Sampler),
            ResourceDecl::new("LayerTexture", ResourceKind::Texture2DArray),
            ResourceDecl::new("Environment", ResourceKind::TextureCube),
            ResourceDecl::structured("VertexOffsets", TypeRef::float4(), AccessMode::ReadOnly),
            ResourceDecl::uniform("PointLights", TypeRef::named(qualified("PointLight", "PointLightsInfo"))),
            ResourceDecl::uniform("Material", TypeRef::named(qualified("CustomStructResource", "Material"))),
        ],
        ..Default::default()
    };

    basic(&mut program);
    vertex_and_fragment(&mut program);
    vertex_only(&mut program);
    fragment_only(&mut program);
    texture_sampler(&mut program);
    complex_expression(&mut program);
    swizzles(&mut program);
    custom_method_calls(&mut program);
    built_in_variables(&mut program);
    multiple_resource_sets(&mut program);
    multiple_color_output(&mut program);
    multisample_texture(&mut program);
    matrix_members(&mut program);
    out_parameters(&mut program);
    switch_statements(&mut program);
    enums(&mut program);
    expression_bodied(&mut program);
    structured_buffer(&mut program);
    simple_compute(&mut program);
    complex_compute(&mut program);
    vector_constructors(&mut program);
    vector_indexers(&mut program);
    vector_static_properties(&mut program);
    vector_static_functions(&mut program);
    math_functions(&mut program);
    custom_method_using_uniform(&mut program);
    point_light(&mut program);
    uint_vectors(&mut program);
    uint_vertex_attribs(&mut program);
    variable_types(&mut program);
    depth_texture_sampler(&mut program);
    texture_array_sampler(&mut program);
    texture_cube_sampler(&mut program);
    vertex_with_structured_buffer(&mut program);
    shadow_depth(&mut program);
    custom_struct_resource(&mut program);
    partial_vertex(&mut program);
    program
}

fn constant_color_vs(name: &str) -> FunctionDecl {
    FunctionDecl::new(name, TypeRef::float4())
        .stage(Stage::Vertex)
        .body(vec![SourceStmt::ret(float4_literal(0.0, 0.0, 0.0, 1.0))])
}

/// The fragment entry lacks its stage marker.
pub(crate) fn missing_function_attribute() -> ResolvedProgram {
    ResolvedProgram {
        functions: vec![
            constant_color_vs("MissingFunctionAttribute.VS"),
            FunctionDecl::new("MissingFunctionAttribute.FS", TypeRef::float4())
                .body(vec![SourceStmt::ret(float4_literal(1.0, 1.0, 1.0, 1.0))]),
        ],
        ..Default::default()
    }
}

fn sample_at_center(texture: &str, sampler: &str) -> SourceExpr {
    SourceExpr::intrinsic(
        "Sample",
        vec![
            SourceExpr::resource(texture),
            SourceExpr::resource(sampler),
            SourceExpr::construct(TypeRef::float2(), vec![SourceExpr::float(0.5), SourceExpr::float(0.5)]),
        ],
        TypeRef::float4(),
    )
}

/// Two resources at (0, 0), both sampled by the same fragment entry.
pub(crate) fn duplicate_binding() -> ResolvedProgram {
    ResolvedProgram {
        resources: vec![
            ResourceDecl::new("First", ResourceKind::Texture2D).at(0, 0),
            ResourceDecl::new("Second", ResourceKind::Sampler).at(0, 0),
        ],
        functions: vec![FunctionDecl::new("DuplicateBinding.FS", TypeRef::float4())
            .stage(Stage::Fragment)
            .body(vec![SourceStmt::ret(sample_at_center("First", "Second"))])],
        ..Default::default()
    }
}

/// Two textures at (0, 0) that no single entry point uses together.
pub(crate) fn unrelated_sets() -> ResolvedProgram {
    ResolvedProgram {
        resources: vec![
            ResourceDecl::new("ATexture", ResourceKind::Texture2D).at(0, 0),
            ResourceDecl::new("BTexture", ResourceKind::Texture2D).at(0, 0),
            ResourceDecl::new("SharedSampler", ResourceKind::Sampler),
        ],
        functions: vec![
            FunctionDecl::new("A.FS", TypeRef::float4())
                .stage(Stage::Fragment)
                .body(vec![SourceStmt::ret(float4_literal(1.0, 0.0, 0.0, 1.0))]),
            FunctionDecl::new("B.FS", TypeRef::float4())
                .stage(Stage::Fragment)
                .body(vec![SourceStmt::ret(sample_at_center("BTexture", "SharedSampler"))]),
            FunctionDecl::new("Both.FS", TypeRef::float4())
                .stage(Stage::Fragment)
                .body(vec![SourceStmt::ret(mul(
                    sample_at_center("ATexture", "SharedSampler"),
                    sample_at_center("BTexture", "SharedSampler"),
                    TypeRef::float4(),
                ))]),
        ],
        ..Default::default()
    }
}

fn percent_vs(name: &str, body: SourceStmt) -> FunctionDecl {
    let v = local("v", TypeRef::float4());
    FunctionDecl::new(name, TypeRef::float4())
        .stage(Stage::Vertex)
        .body(vec![
            SourceStmt::declare("v", TypeRef::float4(), float4_literal(1.0, 2.0, 3.0, 4.0)),
            body,
            SourceStmt::ret(v),
        ])
}

/// `%` on a float vector.
pub(crate) fn percent_operator() -> ResolvedProgram {
    let v = local("v", TypeRef::float4());
    let rem = SourceExpr::binary(
        BinaryOp::Rem,
        v.clone(),
        float4_literal(2.0, 2.0, 2.0, 2.0),
        TypeRef::float4(),
    );
    ResolvedProgram {
        functions: vec![percent_vs("PercentOperator.PercentVS", SourceStmt::assign(v, rem))],
        ..Default::default()
    }
}

/// `%=` on a float vector.
pub(crate) fn percent_equals() -> ResolvedProgram {
    let v = local("v", TypeRef::float4());
    ResolvedProgram {
        functions: vec![percent_vs(
            "PercentEquals.PercentEqualsVS",
            SourceStmt::compound(v, AssignOp::Rem, float4_literal(2.0, 2.0, 2.0, 2.0)),
        )],
        ..Default::default()
    }
}

pub(crate) fn recursive() -> ResolvedProgram {
    let x = local("x", TypeRef::float());
    ResolvedProgram {
        functions: vec![
            FunctionDecl::new("Recursive.FS", TypeRef::float4())
                .stage(Stage::Fragment)
                .body(vec![SourceStmt::ret(SourceExpr::call(
                    "Recursive.Helper",
                    vec![SourceExpr::float(1.0)],
                    TypeRef::float4(),
                ))]),
            FunctionDecl::new("Recursive.Helper", TypeRef::float4())
                .param(ParamDecl::new("x", TypeRef::float()))
                .body(vec![SourceStmt::ret(SourceExpr::call(
                    "Recursive.Helper",
                    vec![x],
                    TypeRef::float4(),
                ))]),
        ],
        ..Default::default()
    }
}

/// A vertex output without a system position.
pub(crate) fn invalid_vertex_output() -> ResolvedProgram {
    let output_type = TypeRef::named("InvalidVertexOutput.Output");
    ResolvedProgram {
        structs: vec![StructDecl {
            name: "InvalidVertexOutput.Output".to_string(),
            fields: vec![FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color)],
        }],
        functions: vec![FunctionDecl::new("InvalidVertexOutput.VS", output_type.clone())
            .stage(Stage::Vertex)
            .body(vec![
                declare("output", output_type.clone()),
                SourceStmt::assign(
                    local("output", output_type.clone()).member("Color", TypeRef::float4()),
                    float4_literal(1.0, 1.0, 1.0, 1.0),
                ),
                SourceStmt::ret(local("output", output_type)),
            ])],
        ..Default::default()
    }
}

/// A vertex stage writing `{Position, Color, Uv}` and fragment stages reading
/// either `{Position, Uv}` or the leading `{Position, Color}`.
pub(crate) fn varying_mismatch() -> ResolvedProgram {
    let output_type = TypeRef::named("VaryingMismatch.VertexOutput");
    let output = local("output", output_type.clone());
    let uv_input = TypeRef::named("VaryingMismatch.UvInput");
    let color_input = TypeRef::named("VaryingMismatch.ColorInput");
    let position = || FieldDecl::new("Position", TypeRef::float4()).with_semantic(Semantic::SystemPosition);
    let color = || FieldDecl::new("Color", TypeRef::float4()).with_semantic(Semantic::Color);
    let uv = || FieldDecl::new("Uv", TypeRef::float2()).with_semantic(Semantic::TextureCoordinate);
    let fragment = |name: &str, input: &TypeRef, body: SourceExpr| {
        FunctionDecl::new(name, TypeRef::float4())
            .stage(Stage::Fragment)
            .param(ParamDecl::new("input", input.clone()))
            .body(vec![SourceStmt::ret(body)])
    };

    ResolvedProgram {
        structs: vec![
            StructDecl {
                name: "VaryingMismatch.VertexOutput".to_string(),
                fields: vec![position(), color(), uv()],
            },
            StructDecl {
                name: "VaryingMismatch.UvInput".to_string(),
                fields: vec![position(), uv()],
            },
            StructDecl {
                name: "VaryingMismatch.ColorInput".to_string(),
                fields: vec![position(), color()],
            },
        ],
        functions: vec![
            FunctionDecl::new("VaryingMismatch.VS", output_type.clone())
                .stage(Stage::Vertex)
                .body(vec![
                    declare("output", output_type),
                    SourceStmt::assign(
                        output.clone().member("Position", TypeRef::float4()),
                        float4_literal(0.0, 0.0, 0.0, 1.0),
                    ),
                    SourceStmt::assign(
                        output.clone().member("Color", TypeRef::float4()),
                        float4_literal(1.0, 0.0, 0.0, 1.0),
                    ),
                    SourceStmt::assign(
                        output.clone().member("Uv", TypeRef::float2()),
                        SourceExpr::construct(TypeRef::float2(), vec![SourceExpr::float(0.5)]),
                    ),
                    SourceStmt::ret(output),
                ]),
            fragment(
                "VaryingMismatch.UvFS",
                &uv_input,
                SourceExpr::construct(
                    TypeRef::float4(),
                    vec![
                        local("input", uv_input.clone()).member("Uv", TypeRef::float2()),
                        SourceExpr::float(0.0),
                        SourceExpr::float(1.0),
                    ],
                ),
            ),
            fragment(
                "VaryingMismatch.ColorFS",
                &color_input,
                local("input", color_input.clone()).member("Color", TypeRef::float4()),
            ),
        ],
        ..Default::default()
    }
}

/// A vertex output whose system position is a `float3`.
pub(crate) fn narrow_vertex_position() -> ResolvedProgram {
    let output_type = TypeRef::named("NarrowPosition.Output");
    ResolvedProgram {
        structs: vec![StructDecl {
            name: "NarrowPosition.Output".to_string(),
            fields: vec![FieldDecl::new("Position", TypeRef::float3()).with_semantic(Semantic::SystemPosition)],
        }],
        functions: vec![FunctionDecl::new("NarrowPosition.VS", output_type.clone())
            .stage(Stage::Vertex)
            .body(vec![
                declare("output", output_type.clone()),
                SourceStmt::assign(
                    local("output", output_type.clone()).member("Position", TypeRef::float3()),
                    SourceExpr::construct(TypeRef::float3(), vec![SourceExpr::float(0.0)]),
                ),
                SourceStmt::ret(local("output", output_type)),
            ])],
        ..Default::default()
    }
}

/// One entry point calling `intrinsic` on values of a shape it accepts.
///
/// Compute entries host `Barrier`, fragment entries everything else.
pub(crate) fn intrinsic_call(intrinsic: Intrinsic) -> (ResolvedProgram, EntryPointSet) {
    let resources = vec![
        ResourceDecl::uniform("Transform", TypeRef::matrix4x4()),
        ResourceDecl::new("Surface", ResourceKind::Texture2D),
        ResourceDecl::new("Sampler", ResourceKind::Sampler),
        ResourceDecl::new("Scene", ResourceKind::Texture2DMS),
    ];
    if intrinsic == Intrinsic::Barrier {
        let program = ResolvedProgram {
            resources,
            functions: vec![FunctionDecl::new("Intrinsics.CS", TypeRef::Void)
                .stage(Stage::Compute)
                .thread_group_size(1, 1, 1)
                .body(vec![SourceStmt::Expr(SourceExpr::intrinsic(
                    intrinsic.name(),
                    Vec::new(),
                    TypeRef::Void,
                ))])],
            ..Default::default()
        };
        return (program, EntryPointSet::compute("Intrinsics.CS"));
    }

    let v = || local("v", TypeRef::float4());
    let xyz = || v().member("xyz", TypeRef::float3());
    let call = |args: Vec<SourceExpr>, ty: TypeRef| SourceExpr::intrinsic(intrinsic.name(), args, ty);
    let splat = |value: SourceExpr| SourceExpr::construct(TypeRef::float4(), vec![value]);
    let center = SourceExpr::construct(TypeRef::float2(), vec![SourceExpr::float(0.5)]);

    let result = match intrinsic {
        Intrinsic::Sample => call(
            vec![SourceExpr::resource("Surface"), SourceExpr::resource("Sampler"), center],
            TypeRef::float4(),
        ),
        Intrinsic::SampleLevel => call(
            vec![
                SourceExpr::resource("Surface"),
                SourceExpr::resource("Sampler"),
                center,
                SourceExpr::float(0.0),
            ],
            TypeRef::float4(),
        ),
        Intrinsic::Load => call(
            vec![
                SourceExpr::resource("Scene"),
                SourceExpr::construct(TypeRef::Vector(ScalarKind::Int, 2), vec![SourceExpr::int(0)]),
                SourceExpr::int(0),
            ],
            TypeRef::float4(),
        ),
        Intrinsic::Transpose => call(vec![SourceExpr::resource("Transform")], TypeRef::matrix4x4())
            .index(SourceExpr::int(0), TypeRef::float4()),
        Intrinsic::Dot | Intrinsic::Distance => splat(call(vec![v(), v()], TypeRef::float())),
        Intrinsic::Length => splat(call(vec![v()], TypeRef::float())),
        Intrinsic::Cross | Intrinsic::Reflect => {
            float4(call(vec![xyz(), xyz()], TypeRef::float3()), SourceExpr::float(1.0))
        }
        Intrinsic::Normalize => float4(call(vec![xyz()], TypeRef::float3()), SourceExpr::float(1.0)),
        other => call((0..other.arity()).map(|_| v()).collect(), TypeRef::float4()),
    };

    let program = ResolvedProgram {
        resources,
        functions: vec![FunctionDecl::new("Intrinsics.FS", TypeRef::float4())
            .stage(Stage::Fragment)
            .body(vec![
                SourceStmt::declare("v", TypeRef::float4(), float4_literal(0.25, 0.5, 0.75, 1.0)),
                SourceStmt::ret(result),
            ])],
        ..Default::default()
    };
    (program, EntryPointSet::fragment("Intrinsics.FS"))
}
